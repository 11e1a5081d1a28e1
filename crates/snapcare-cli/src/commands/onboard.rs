//! First-run walkthrough.
//!
//! A terminal has no permission dialogs, so the gate grants everything
//! except the permissions named with `--deny`.

use clap::{Args, ValueEnum};
use snapcare_core::onboarding::{self, OnboardingOutcome, Permission, PermissionGate, PermissionStatus};

use super::{open_store, CmdResult};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DenyArg {
    Camera,
    MediaLibrary,
}

impl From<DenyArg> for Permission {
    fn from(arg: DenyArg) -> Self {
        match arg {
            DenyArg::Camera => Permission::Camera,
            DenyArg::MediaLibrary => Permission::MediaLibrary,
        }
    }
}

#[derive(Args)]
pub struct OnboardArgs {
    /// Refuse a permission when asked
    #[arg(long, value_enum)]
    deny: Vec<DenyArg>,
    /// Only report whether onboarding is still pending
    #[arg(long)]
    status: bool,
}

struct CliGate {
    denied: Vec<Permission>,
}

impl PermissionGate for CliGate {
    fn request(&mut self, permission: Permission) -> PermissionStatus {
        let status = if self.denied.contains(&permission) {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        };
        let answer = match status {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
        };
        println!("{permission} access: {answer}");
        status
    }
}

pub fn run(args: OnboardArgs) -> CmdResult {
    let mut store = open_store()?;

    if args.status {
        if onboarding::is_first_run(&store)? {
            println!("onboarding pending");
        } else {
            println!("onboarding complete");
        }
        return Ok(());
    }

    if !onboarding::is_first_run(&store)? {
        println!("onboarding already complete");
        return Ok(());
    }

    let mut gate = CliGate {
        denied: args.deny.into_iter().map(Permission::from).collect(),
    };
    match onboarding::complete(&mut store, &mut gate)? {
        OnboardingOutcome::Completed => println!("onboarding complete"),
        OnboardingOutcome::Denied(permission) => {
            return Err(format!(
                "{permission} access is required; run onboarding again to grant it"
            )
            .into());
        }
    }
    Ok(())
}
