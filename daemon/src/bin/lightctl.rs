//! Query and flip the device toggles from a shell.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use lights::props::{AndroidProperties, AndroidSettings};
use lights::toggles::{AdbOverNetwork, NoKeyguard, SysfsToggle, Toggle};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    toggle: ToggleName,
}

#[derive(Subcommand, Debug)]
enum ToggleName {
    /// Forced fast charging over USB
    FastCharge {
        #[arg(value_enum, default_value_t = Action::Status)]
        action: Action,
    },
    /// Headphone jack detection override
    JackDetect {
        #[arg(value_enum, default_value_t = Action::Status)]
        action: Action,
    },
    /// adbd listening on TCP port 5555
    AdbNetwork {
        #[arg(value_enum, default_value_t = Action::Status)]
        action: Action,
    },
}

impl ToggleName {
    fn action(&self) -> Action {
        match self {
            ToggleName::FastCharge { action }
            | ToggleName::JackDetect { action }
            | ToggleName::AdbNetwork { action } => *action,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Action {
    Status,
    Toggle,
}

fn main() -> Result<()> {
    lights::init_logging(log::LevelFilter::Warn);
    let args = Args::parse();
    let props = Arc::new(AndroidProperties);

    let action = args.toggle.action();
    let toggle: Box<dyn Toggle> = match args.toggle {
        ToggleName::FastCharge { .. } => Box::new(SysfsToggle::fast_charge()),
        ToggleName::JackDetect { .. } => Box::new(SysfsToggle::jack_detect(props)),
        ToggleName::AdbNetwork { .. } => {
            Box::new(AdbOverNetwork::new(
                props,
                Arc::new(AndroidSettings),
                Arc::new(NoKeyguard),
            ))
        }
    };

    if let Action::Toggle = action {
        toggle.toggle()?;
    }
    println!("{} ({:?})", toggle.label(), toggle.state());
    Ok(())
}
