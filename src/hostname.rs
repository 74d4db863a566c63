//! Lab hostname derivation
//!
//! Lab nodes are named after the low two octets of their private IPv4
//! address, zero padded: `10.0.3.42` in `lab.example.com` becomes
//! `003042.lab.example.com`. When the address can't be used, the short
//! hostname reported by the metadata service is the fallback.
//!
//! The bootcmd pipeline in the rendered template follows the same
//! precedence.

/// Derive the lab hostname from metadata service responses
///
/// The IP-derived name wins; the short metadata hostname is used only when
/// `local_ipv4` doesn't yield one.
pub fn derive_hostname(metadata_hostname: &str, local_ipv4: &str, lab_domain: &str) -> Option<String> {
    ip_derived_hostname(local_ipv4, lab_domain).or_else(|| short_hostname(metadata_hostname))
}

/// `<octet3><octet4>.<lab_domain>`, each octet padded to three digits
///
/// `local_ipv4` must be four dot-separated numeric parts with the last two
/// non-empty, the same shape the bootcmd sed expression accepts.
pub fn ip_derived_hostname(local_ipv4: &str, lab_domain: &str) -> Option<String> {
    let parts: Vec<&str> = local_ipv4.trim().split('.').collect();
    let [first, second, third, fourth] = parts[..] else {
        return None;
    };

    if !all_digits(first) || !all_digits(second) {
        return None;
    }
    if third.is_empty() || fourth.is_empty() || !all_digits(third) || !all_digits(fourth) {
        return None;
    }

    let third: u64 = third.parse().ok()?;
    let fourth: u64 = fourth.parse().ok()?;
    Some(format!("{:03}{:03}.{}", third, fourth, lab_domain))
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Metadata hostname with everything from the first `.` or `-` removed
pub fn short_hostname(metadata_hostname: &str) -> Option<String> {
    let short = metadata_hostname
        .trim()
        .split(['.', '-'])
        .next()
        .unwrap_or_default();

    if short.is_empty() {
        None
    } else {
        Some(short.to_string())
    }
}
