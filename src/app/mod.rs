pub mod confirmation_use_case;
pub mod ports;
