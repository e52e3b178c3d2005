use clap::{Parser, Subcommand};
use piekit::catalog::{self, BuiltinCatalog, ItemKind};
use piekit::control::{self, ControlCommand};
use piekit::icon::{self, IconName};
use piekit::item::{ItemName, ItemTypeId, peek_type};
use piekit::ItemCatalog;

#[derive(Parser, Debug)]
#[command(name = "piekit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List all item types known to the catalog
    List,
    /// Show details about one item type
    Describe {
        /// The item type (e.g. "CustomMenu")
        kind: String,
    },
    /// Print a drag payload for a new item of the given type
    Payload {
        kind: String,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'i', long)]
        icon: Option<String>,

        /// Pin the item to a fixed angle in degrees
        #[arg(short = 'a', long)]
        angle: Option<f64>,
    },
    /// Check what a payload may be dropped into
    Check { payload: String },
    /// Bring the running editor to the front
    Present,
    /// Ask the running editor to reload its configuration
    Reload,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for kind in BuiltinCatalog.kinds() {
                println!("{:<12} {:<6} {}", kind, kind.class(), kind.subtitle());
            }
            Ok(())
        }
        Commands::Describe { kind } => describe(&ItemTypeId::new(kind)),
        Commands::Payload {
            kind,
            name,
            icon,
            angle,
        } => payload(&ItemTypeId::new(kind), name, icon, angle),
        Commands::Check { payload } => {
            let kind = peek_type(&payload)?;
            if BuiltinCatalog.is_container_type(&kind) {
                println!("'{}' is a container and can hold other items", kind);
            } else if BuiltinCatalog.is_menu_type(&kind) {
                println!("'{}' is a menu but cannot hold configured items", kind);
            } else {
                println!("'{}' is an action", kind);
            }
            Ok(())
        }
        Commands::Present => Ok(control::send(ControlCommand::Present)?),
        Commands::Reload => Ok(control::send(ControlCommand::Reload)?),
    }
}

fn describe(kind: &ItemTypeId) -> anyhow::Result<()> {
    let kind: ItemKind = catalog::lookup(kind)?;
    let icon_path = icon::find_icon_path(&IconName::new(kind.icon()));

    println!("{} ({})", kind.label(), kind);
    println!("  class:    {}", kind.class());
    println!("  icon:     {}", kind.icon());
    if let Some(path) = icon_path {
        println!("            {}", path.display());
    }
    println!("  data:     {}", kind.default_data());
    println!("  {}", kind.subtitle());
    Ok(())
}

fn payload(
    kind: &ItemTypeId,
    name: Option<String>,
    icon: Option<String>,
    angle: Option<f64>,
) -> anyhow::Result<()> {
    let mut config = catalog::lookup(kind)?.new_config();

    if let Some(name) = name {
        config.name = ItemName::new(name);
    }
    if let Some(icon) = icon {
        config.icon = IconName::new(icon);
    }
    if let Some(angle) = angle {
        if !(0.0..360.0).contains(&angle) {
            anyhow::bail!("Angle {} is outside of [0, 360)", angle);
        }
        config.angle = angle;
    }

    println!("{}", config.to_payload()?);
    Ok(())
}
