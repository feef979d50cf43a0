use line_formatter::{FormatterConfig, LineFormatter};
use tracing::{error, info};

fn main() {
    let config = FormatterConfig::new("AS", "worker");
    let formatter = match LineFormatter::from_config(&config) {
        Ok(formatter) => formatter,
        Err(e) => {
            eprintln!("cannot start logging: {}", e);
            std::process::exit(1);
        }
    };

    let subscriber = tracing_subscriber::fmt().event_format(formatter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");

    info!(total_time = 56, tag_group = "qrcode", remote = "host:9010", grpc.time_ms = 200, "hello");
    error!(user_id = 42, reason = "invalid password", "authentication failed");
}
