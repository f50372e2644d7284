use clap::{crate_authors, crate_description, crate_version, Arg, ArgAction, Command};
use pretty_env_logger::env_logger::Builder;
use std::env;
use std::io::Write;
use std::process::exit;

use wan_dnssync::Config;

fn set_logger_level(b: &mut Builder) {
    let mut b = b;
    if env::var("RUST_LOG").is_err() {
        b = b.filter_level(log::LevelFilter::Info)
    }
    b.init();
}

fn setup_logger() {
    // Adapted from env_logger examples. <3 Systemd support
    match std::env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let builder = &mut pretty_env_logger::env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            set_logger_level(builder);
        }
        _ => {
            let builder = &mut pretty_env_logger::formatted_builder();
            set_logger_level(builder);
        }
    };
}

pub(crate) fn main() {
    let cli = Command::new("WAN DNSSync")
        .about(format!(
            "{}\n{} {}",
            crate_description!(),
            "Configuration is managed using environment variables.",
            "See the docs for more information.",
        ))
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .help("Check the configuration"),
        )
        .arg(
            Arg::new("dry-run")
                .action(ArgAction::SetTrue)
                .long("dry-run")
                .help("Resolve addresses and show changes without applying them"),
        )
        .version(crate_version!())
        .author(crate_authors!("\n"));

    let args = cli.get_matches();

    setup_logger();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(err) => {
            println!("{err}");
            exit(2);
        }
    };

    let check = args.get_flag("check");
    let service_config = config.service_config();
    let matcher = config.gateway_matcher();

    let service = match config.get_service() {
        Ok(s) => s,
        Err(err) => {
            println!("{err}");
            exit(2);
        }
    };

    if check {
        tracing::info!(
            zone_id = service_config.zone_id.as_str(),
            record = service_config.record_name.as_str(),
            record_wan2 = service_config.record_name_wan2.as_deref().unwrap_or("-"),
            ttl = service_config.ttl,
            gateway_models = matcher.patterns().join(",").as_str(),
            "Configuration is valid."
        );
        exit(0);
    }

    let result = service.run(args.get_flag("dry-run"));
    println!("{}", result.to_response());

    if !result.is_success() {
        exit(1);
    }
}
