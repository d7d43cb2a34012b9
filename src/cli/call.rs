use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::list::{format_output, numbered_contacts};
use crate::config::{Config, Contact};
use crate::{die, warn, CallArgs, ListingFormat};

/// Builds a `tel:` URI from a phone number as people write it, keeping the
/// leading `+` and the digits. Returns `None` when no digits remain.
pub(crate) fn tel_uri(phone: &str) -> Option<String> {
    let mut number = String::with_capacity(phone.len());

    for (i, c) in phone.trim().chars().enumerate() {
        match c {
            '+' if i == 0 => number.push(c),
            '0'..='9' => number.push(c),
            _ => {}
        }
    }

    if number.chars().any(|c| c.is_ascii_digit()) {
        Some(format!("tel:{}", number))
    } else {
        None
    }
}

/// The command that hands a URI to the desktop's default handler
fn opener(uri: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", uri]);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(uri);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(uri);
        c
    }
}

fn dial(contact: &Contact) {
    let uri = match tel_uri(&contact.phone) {
        Some(uri) => uri,
        None => die!(
            "the phone number of \"{}\" (\"{}\") contains no digits",
            contact.name,
            contact.phone
        ),
    };

    println!("Calling {} at {}", contact.name, contact.phone);

    let mut cmd = opener(&uri);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());

    debug!(?cmd, "opening the dialer");

    // The dialer outlives us, nothing waits on it
    match cmd.spawn() {
        Ok(child) => info!(%uri, pid = child.id(), "handed the number to the dialer"),
        Err(err) => warn!("failed to open a dialer ({}), dial {} yourself", err, contact.phone),
    }
}

pub(crate) fn call_cmd(config: &Config, args: &CallArgs) {
    if config.contacts.is_empty() {
        die!("the config lists no contacts, add a [[contacts]] entry");
    }

    let number = match args.contact {
        Some(number) => number,
        None => {
            format_output(numbered_contacts(config), ListingFormat::Table);
            return;
        }
    };

    match number.checked_sub(1).and_then(|i| config.contacts.get(i)) {
        Some(contact) => dial(contact),
        None => die!(
            "there is no contact {}, pick one between 1 and {}",
            number,
            config.contacts.len()
        ),
    }
}
