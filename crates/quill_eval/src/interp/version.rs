//! `req` statements: interpreter version gates.
//!
//! Pure validation — the only effect is a `VersionConflict` on
//! mismatch, naming both versions.

use semver::Version;

use quill_ir::{Name, SharedInterner, VersionReq};

use crate::errors::{value_error, version_conflict, RuntimeError};
use crate::interp::Interpreter;

/// A requirement version: major.minor with an optional patch.
struct ReqVersion {
    major: u64,
    minor: u64,
    patch: Option<u64>,
}

impl ReqVersion {
    /// Lowest concrete version matching this requirement.
    fn floor(&self) -> Version {
        Version::new(self.major, self.minor, self.patch.unwrap_or(0))
    }

    /// Highest concrete version matching this requirement.
    fn ceiling(&self) -> Version {
        Version::new(self.major, self.minor, self.patch.unwrap_or(u64::MAX))
    }
}

fn parse_req(interner: &SharedInterner, name: Name) -> Result<ReqVersion, RuntimeError> {
    let text = interner.lookup(name);
    let mut parts = text.split('.');
    let major = parts.next().and_then(|p| p.parse().ok());
    let minor = parts.next().and_then(|p| p.parse().ok());
    let patch = match parts.next() {
        None => None,
        Some(p) => Some(
            p.parse()
                .map_err(|_| value_error(format!("malformed version 'v{text}'")))?,
        ),
    };
    match (major, minor, parts.next()) {
        (Some(major), Some(minor), None) => Ok(ReqVersion {
            major,
            minor,
            patch,
        }),
        _ => Err(value_error(format!("malformed version 'v{text}'"))),
    }
}

fn current() -> Version {
    Version::parse(Interpreter::VERSION).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// Check a requirement against the interpreter version.
pub(crate) fn check(interner: &SharedInterner, req: &VersionReq) -> Result<(), RuntimeError> {
    let actual = current();
    let (matched, shown) = match req {
        VersionReq::Exact(v) => {
            let req = parse_req(interner, *v)?;
            let matched = req.floor() <= actual && actual <= req.ceiling();
            (matched, format!("v{}", interner.lookup(*v)))
        }
        VersionReq::AtLeast(v) => {
            let req = parse_req(interner, *v)?;
            (actual >= req.floor(), format!("+v{}", interner.lookup(*v)))
        }
        VersionReq::AtMost(v) => {
            let req = parse_req(interner, *v)?;
            (
                actual <= req.ceiling(),
                format!("-v{}", interner.lookup(*v)),
            )
        }
        VersionReq::Range(low, high) => {
            let low_req = parse_req(interner, *low)?;
            let high_req = parse_req(interner, *high)?;
            (
                low_req.floor() <= actual && actual <= high_req.ceiling(),
                format!("v{} - v{}", interner.lookup(*low), interner.lookup(*high)),
            )
        }
    };
    if matched {
        Ok(())
    } else {
        Err(version_conflict(&shown, Interpreter::VERSION))
    }
}
