// SPDX-License-Identifier: MPL-2.0
use part_finder::app::{paths, Flags, GallerySession, Message, Runtime, SessionSettings};
use part_finder::application::port::Backend;
use part_finder::config;
use part_finder::domain::{Item, ItemId, StagedFile};
use part_finder::error::{Error, Result};
use part_finder::i18n::I18n;
use part_finder::infrastructure::{BlobPreviewTable, HttpBackend, InMemoryBackend};
use std::process::ExitCode;

const HELP: &str = "\
part-finder - browse the part catalog

USAGE:
  part-finder [OPTIONS] [ADDRESS]

ARGS:
  ADDRESS               Start address, e.g. /item/a1b2c3d4

OPTIONS:
  --api-url URL         Backend base URL (overrides PART_FINDER_API_URL)
  --config-dir DIR      Directory holding settings.toml
  --lang LOCALE         UI language, e.g. en-US or fr
  --offline             Use a built-in demo catalog instead of the backend
  -v, --verbose         Debug logging (RUST_LOG takes precedence)
  -h, --help            Print this help
";

fn parse_flags() -> Result<Option<Flags>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let cli_error = |e: pico_args::Error| Error::Config(e.to_string());
    let mut flags = Flags {
        lang: args.opt_value_from_str("--lang").map_err(cli_error)?,
        api_url: args.opt_value_from_str("--api-url").map_err(cli_error)?,
        config_dir: args.opt_value_from_str("--config-dir").map_err(cli_error)?,
        offline: args.contains("--offline"),
        verbose: args.contains(["-v", "--verbose"]),
        address: None,
    };
    flags.address = args
        .finish()
        .into_iter()
        .next()
        .and_then(|s| s.into_string().ok());
    Ok(Some(flags))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn demo_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    let parts = [
        ("m6-bolt", "M6 bolt", "zinc plated, 20 mm", &["front.jpg", "side.jpg"][..]),
        ("hex-nut", "Hex nut M6", "", &["top.jpg"][..]),
        ("washer", "Flat washer", "stainless", &[][..]),
    ];
    for (id, name, meta, photos) in parts {
        backend.insert_item(&Item::new(id, name).with_meta_text(meta));
        for photo in photos {
            backend.insert_image(&ItemId::new(id), &StagedFile::new(*photo, photo.as_bytes().to_vec()));
        }
    }
    backend
}

async fn run<B: Backend + 'static>(
    backend: B,
    mut session: GallerySession,
    i18n: &I18n,
) -> usize {
    let mut runtime = Runtime::new(backend);
    let applied = runtime.dispatch_all(&mut session, [Message::Mount]).await;
    log::debug!("session idle after {applied} completion(s)");

    println!("{}", i18n.tr("cli-catalog-heading"));
    for item in session.items() {
        println!("  {:<12} {}", item.id, item.display_name);
    }
    println!("{}", i18n.tr("cli-recent-heading"));
    for item in session.recent() {
        println!("  {:<12} {}", item.id, item.display_name);
    }

    println!("{} {}", i18n.tr("cli-address"), session.address());
    match session.active_item() {
        Some(item) => {
            println!("{} {} ({})", i18n.tr("cli-open-item"), item.display_name, item.id);
            if !session.metadata().text().is_empty() {
                println!("  {}", session.metadata().text());
            }
            for image in session.images() {
                println!("  - {image}");
            }
        }
        None if session.selected_id().is_some() => println!("{}", i18n.tr("cli-item-not-found")),
        None => {}
    }

    let notifications: Vec<_> = session.notifications().all_oldest_first().collect();
    for notification in &notifications {
        println!("[{}] {}", notification.severity().label(), i18n.render(notification));
    }
    notifications.len()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(flags.verbose);
    paths::init_cli_overrides(flags.config_dir.clone());

    let (config, warning) = config::load();
    let i18n = I18n::new(flags.lang.clone(), &config);
    let settings = SessionSettings::from_config(&config);
    let address = flags
        .address
        .clone()
        .unwrap_or_else(|| settings.scheme.root().to_string());

    let mut session = GallerySession::new(settings, address, BlobPreviewTable::global());
    if let Some(key) = warning {
        session.notify(part_finder::notifications::Notification::warning(key));
    }

    if flags.offline {
        run(demo_backend(), session, &i18n).await;
        return ExitCode::SUCCESS;
    }

    let base_url = config.api_base_url(flags.api_url.as_deref());
    match HttpBackend::new(&base_url, config.user_agent()) {
        Ok(backend) => {
            log::info!("using backend at {base_url}");
            run(backend, session, &i18n).await;
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", Error::from(err));
            ExitCode::FAILURE
        }
    }
}
