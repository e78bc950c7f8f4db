//! Vantage CLI.

#[cfg(feature = "cli")]
mod args;
#[cfg(feature = "cli")]
mod commands;

#[cfg(feature = "cli")]
fn main() {
    use args::{Args, Command};
    use clap::Parser;

    let args = Args::parse();
    let loader = match commands::load_manifest(args.manifest.as_deref()) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("[vantage] manifest error: {e:#}");
            std::process::exit(1);
        }
    };
    let manifest = loader.manifest();
    vantage_adapter_axum::init_logger(manifest);

    match args.cmd {
        Command::Inspect(resolve) => match commands::inspect(manifest, &resolve) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("[vantage] inspect error: {e:#}");
                std::process::exit(1);
            }
        },
        Command::Url {
            route,
            dotted,
            resolve,
        } => match commands::url(manifest, &route, dotted, &resolve) {
            Ok(url) => println!("{url}"),
            Err(e) => {
                eprintln!("[vantage] url error: {e:#}");
                std::process::exit(1);
            }
        },
        Command::Serve { addr } => {
            if let Err(e) = commands::serve(manifest, addr.as_deref()) {
                eprintln!("[vantage] serve error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("vantage-cli built without `cli` feature. Rebuild with `--features cli`.");
}
