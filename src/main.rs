use clap::{ArgGroup, Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

use registration_view::app::confirmation_use_case::ConfirmationService;
use registration_view::config::Config;
use registration_view::domain::{PaymentInstruction, RegistrationView, SubmissionRef};
use registration_view::infra::supabase::SupabaseSource;
use registration_view::logging;
use registration_view::server::{self, AppState};

#[derive(Parser)]
#[command(name = "registration_view")]
#[command(about = "Registration confirmation views for form-bearing pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the confirmation API over HTTP
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Resolve one confirmation and print it
    #[command(group(ArgGroup::new("submission").required(true).args(["inscription", "group"])))]
    Confirm {
        /// Page slug
        #[arg(long)]
        page: String,
        /// Inscription id on that page
        #[arg(long)]
        inscription: Option<String>,
        /// Group id
        #[arg(long)]
        group: Option<String>,
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_view(view: &RegistrationView) {
    println!("\n📋 {}: {}", view.page_label, view.display_name);
    println!("   Number(s): {}", view.sequence_display);
    if view.is_group {
        println!("   Participants: {}", view.participant_count);
        for entry in &view.roster {
            match &entry.age {
                Some(age) => println!("   - #{} {} ({})", entry.sequence_number, entry.name, age),
                None => println!("   - #{} {}", entry.sequence_number, entry.name),
            }
        }
    }
    if !view.confirmation_message.is_empty() {
        println!("\n   {}", view.confirmation_message);
    }
    match &view.payment {
        PaymentInstruction::None => {}
        PaymentInstruction::IndividualPayment { key, qr, whatsapp_link } => {
            println!("\n💳 Payment key: {}", key);
            println!("   QR code: {}", qr.image_url());
            if let Some(link) = whatsapp_link {
                println!("   Send receipt: {}", link);
            }
        }
        PaymentInstruction::GroupPayment { total_due, unit_price, participant_count, whatsapp_link } => {
            println!(
                "\n💳 Total due: R$ {:.2} ({} x R$ {:.2})",
                total_due, participant_count, unit_price
            );
            if let Some(link) = whatsapp_link {
                println!("   Pay via WhatsApp: {}", link);
            }
        }
        PaymentInstruction::WhatsAppOnly { link } => {
            println!("\n💬 Arrange payment: {}", link);
        }
    }
    if !view.data_issues.is_empty() {
        println!("\n⚠️  {} data issue(s) recovered", view.data_issues.len());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;
    let source = Arc::new(SupabaseSource::from_config(&config.supabase)?);
    let confirmations = Arc::new(ConfirmationService::new(source));

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            info!("Starting confirmation server on port {}", port);
            server::start_server(AppState { confirmations }, port).await?;
        }
        Commands::Confirm { page, inscription, group, json } => {
            let requested = match (inscription, group) {
                (Some(id), _) => SubmissionRef::Inscription { id },
                (None, Some(group_id)) => SubmissionRef::Group { group_id },
                (None, None) => anyhow::bail!("either --inscription or --group is required"),
            };

            match confirmations.confirmation(&page, &requested).await {
                Ok(view) if json => println!("{}", serde_json::to_string_pretty(&view)?),
                Ok(view) => print_view(&view),
                Err(e) if e.is_not_found() => {
                    println!("❌ Not found: {}", e);
                    std::process::exit(2);
                }
                Err(e) => {
                    error!("Confirmation failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}
