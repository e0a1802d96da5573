use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use nodeup_core::{
    ActivationSwitch, CatalogClient, ElevatedRunner, InstallError, InstallationStore, Installer,
    Settings, SwitchError,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Base URL override for every remote resource, mainly a test seam. The
/// fixture layout mirrors the production hosts: the catalog at
/// `«mirror»/nodeversions.json`, the checksum listing at
/// `«mirror»/dist/latest/SHASUMS.txt`, runtime binaries under
/// `«mirror»/dist` and npm archives under `«mirror»/npm`.
const MIRROR_ENV: &str = "NODEUP_MIRROR";

#[derive(Parser, Debug)]
#[clap(
    name = "nodeup",
    version = "0.1.0",
    about = "Manage side-by-side installations of node.js"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install a node.js version ("latest" for the latest stable version)
    Install { version: String },
    /// Remove an installed version
    Uninstall { version: String },
    /// Switch to the specified installed version
    Use { version: String },
    /// List what is currently installed
    List,
    /// Enable node.js version management
    On,
    /// Disable node.js version management
    Off,
    /// Show or set the directory where versions are stored
    Root { path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    // Settings are fatal before any command logic runs.
    let mut settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("\nERROR {}", e);
            std::process::exit(1);
        }
    };

    let store = InstallationStore::new(settings.root.clone());
    let runner = Arc::new(ElevatedRunner::new(&settings.root));
    let switch = ActivationSwitch::new(store.clone(), settings.symlink.clone(), runner);

    match cli.command {
        Commands::Install { version } => install(&store, &version).await,
        Commands::Uninstall { version } => uninstall(&store, &version).await,
        Commands::Use { version } => activate(&switch, &version).await,
        Commands::List => list(&store, &switch).await,
        Commands::On => enable(&switch).await,
        Commands::Off => disable(&switch).await,
        Commands::Root { path } => root(&mut settings, path).await,
    }
}

fn remote_endpoints(store: &InstallationStore) -> (CatalogClient, Installer) {
    if let Ok(mirror) = std::env::var(MIRROR_ENV) {
        let catalog = CatalogClient::with_urls(
            &format!("{}/nodeversions.json", mirror),
            &format!("{}/dist/latest/SHASUMS.txt", mirror),
        );
        let installer = Installer::with_mirrors(
            store.clone(),
            catalog.clone(),
            &format!("{}/dist", mirror),
            &format!("{}/npm", mirror),
        );
        (catalog, installer)
    } else {
        let catalog = CatalogClient::new();
        (catalog.clone(), Installer::new(store.clone(), catalog))
    }
}

fn print_not_available(version: &str) {
    println!(
        "Version {} is not available. If you are attempting to download a \"just released\" version,",
        version
    );
    println!("it may not be recognized by the nvm service yet (updated hourly). If you feel this is in error and");
    println!("you know the version exists, please visit http://github.com/coreybutler/nodedistro and submit a PR.");
}

async fn install(store: &InstallationStore, requested: &str) -> Result<()> {
    let (catalog_client, installer) = remote_endpoints(store);

    // A failure to resolve "latest" is fatal, like any transport failure.
    let version = installer.resolve(requested).await?;

    if store.is_installed(&version).await {
        println!("Version {} is already installed.", version);
        return Ok(());
    }

    // Availability is checked before any progress output, with a fresh
    // catalog fetch like every catalog operation.
    let catalog = catalog_client.fetch_catalog().await?;
    if !catalog.contains(&version) {
        print_not_available(&version);
        return Ok(());
    }

    // Progress is emitted before the downloads start, so a failed fetch
    // still shows what was being attempted.
    print!("Downloading node.js version {}... ", version);
    io::stdout().flush().ok();

    match installer.install(&version).await {
        Ok(report) => {
            println!("{} bytes downloaded.", report.runtime_bytes);
            println!("Installing npm v{}... done.", report.npm_version);
            println!(
                "\nInstallation complete. If you want to use this version, type\n\nnodeup use {}",
                report.version
            );
            Ok(())
        }
        Err(InstallError::AlreadyInstalled { version }) => {
            println!("\nVersion {} is already installed.", version);
            Ok(())
        }
        Err(InstallError::NotAvailable { version }) => {
            println!();
            print_not_available(&version);
            Ok(())
        }
        Err(InstallError::RuntimeDownload { version, .. }) => {
            println!("ERROR");
            println!(
                "Could not download node.js executable for version {}.",
                version
            );
            Ok(())
        }
        Err(InstallError::PartialInstall {
            version,
            npm_version,
            dir,
            ..
        }) => {
            println!();
            println!("Could not download npm for node v{}.", version);
            println!(
                "Please visit https://github.com/npm/npm/releases/tag/v{} to download npm.",
                npm_version
            );
            println!("It should be extracted to {}", dir.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn uninstall(store: &InstallationStore, version: &str) -> Result<()> {
    if !store.is_installed(version).await {
        println!(
            "node v{} is not installed. Type \"nodeup list\" to see what is installed.",
            version
        );
        return Ok(());
    }

    print!("Uninstalling node v{}...", version);
    match store.uninstall(version).await {
        Ok(()) => println!(" done"),
        Err(e) => {
            // Non-fatal: report and leave remediation to the user.
            log::warn!("uninstall of v{} failed: {}", version, e);
            println!("\nError removing node v{}", version);
            println!(
                "Check to assure {} no longer exists.",
                store.version_dir(version).display()
            );
        }
    }
    Ok(())
}

async fn activate(switch: &ActivationSwitch, version: &str) -> Result<()> {
    match switch.activate(version).await {
        Ok(()) => {
            println!("Now using node v{}", version);
            Ok(())
        }
        Err(SwitchError::NotInstalled { version }) => {
            println!("node v{} is not installed.", version);
            Ok(())
        }
        Err(SwitchError::Privilege(e)) => {
            // Surface the elevation helper's diagnostics verbatim.
            println!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn list(store: &InstallationStore, switch: &ActivationSwitch) -> Result<()> {
    let versions = store.installed_versions().await?;
    let active = switch.active_version().await;

    println!();
    if versions.is_empty() {
        println!("No installations recognized.");
        return Ok(());
    }

    for version in versions {
        let in_use = active.as_deref() == Some(format!("v{}", version).as_str());
        if in_use {
            println!("  * {} (In Use)", version);
        } else {
            println!("    {}", version);
        }
    }
    Ok(())
}

async fn enable(switch: &ActivationSwitch) -> Result<()> {
    println!("nodeup enabled");
    match switch.enable().await {
        Ok(Some(version)) => {
            println!("Now using node v{}", version);
            Ok(())
        }
        Ok(None) => {
            println!(
                "No versions of node.js found. Try installing the latest by typing nodeup install latest"
            );
            Ok(())
        }
        Err(SwitchError::Privilege(e)) => {
            println!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn disable(switch: &ActivationSwitch) -> Result<()> {
    switch.disable().await;
    println!("nodeup disabled");
    Ok(())
}

async fn root(settings: &mut Settings, path: Option<PathBuf>) -> Result<()> {
    match path {
        Some(path) => match settings.update_root(&path).await {
            Ok(()) => {
                println!("\nRoot has been set to {}", path.display());
                Ok(())
            }
            Err(e) => {
                println!("{} does not exist or could not be found.", path.display());
                log::debug!("root update rejected: {}", e);
                Ok(())
            }
        },
        None => {
            println!("\nCurrent Root: {}", settings.root.display());
            Ok(())
        }
    }
}
