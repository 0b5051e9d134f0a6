//! Infrastructure implementation of the `HostIdentity` port.

use anyhow::{Context, Result};
use nix::unistd::{User, geteuid};

use crate::application::ports::HostIdentity;
use crate::domain::Account;

/// Privilege checks and passwd lookups against the running host.
pub struct NixHost;

fn to_account(user: User) -> Account {
    Account {
        name: user.name,
        uid: user.uid.as_raw(),
        gid: user.gid.as_raw(),
        home: user.dir,
        shell: user.shell,
    }
}

impl HostIdentity for NixHost {
    fn is_elevated(&self) -> bool {
        geteuid().is_root()
    }

    fn lookup_user(&self, name: &str) -> Result<Option<Account>> {
        let user = User::from_name(name).with_context(|| format!("looking up user {name}"))?;
        Ok(user.map(to_account))
    }

    fn current_account(&self) -> Result<Option<Account>> {
        let uid = geteuid();
        let user = User::from_uid(uid).with_context(|| format!("looking up uid {uid}"))?;
        Ok(user.map(to_account))
    }
}
