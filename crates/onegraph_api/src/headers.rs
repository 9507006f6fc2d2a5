use std::collections::BTreeMap;

use crate::config::OneGraphConfig;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Build a deterministic header map for OneGraph requests.
///
/// A blank `auth_token` omits `authorization`; token acquisition is the
/// caller's concern.
pub fn build_headers(
    config: &OneGraphConfig,
    auth_token: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if let Some(token) = auth_token.map(str::trim).filter(|token| !token.is_empty()) {
        headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {token}"));
    }
    headers.insert(HEADER_ACCEPT.to_owned(), "application/json".to_owned());
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );

    let ua = match config.user_agent.as_deref() {
        Some(explicit) if !explicit.trim().is_empty() => explicit.trim().to_owned(),
        _ => default_user_agent(),
    };
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    headers
}

/// `onegraph-cli/<version> (<os> <release>; <arch>)`, without the platform
/// part when the kernel cannot be queried.
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match Platform::detect() {
        Some(platform) => format!(
            "onegraph-cli/{version} ({} {}; {})",
            platform.os, platform.release, platform.arch
        ),
        None => format!("onegraph-cli/{version}"),
    }
}

struct Platform {
    os: String,
    release: String,
    arch: &'static str,
}

impl Platform {
    #[cfg(unix)]
    fn detect() -> Option<Self> {
        use std::mem::MaybeUninit;

        let mut uts = MaybeUninit::<libc::utsname>::uninit();
        // SAFETY: `uname` fills the struct when it returns 0.
        if unsafe { libc::uname(uts.as_mut_ptr()) } != 0 {
            return None;
        }
        // SAFETY: checked above.
        let uts = unsafe { uts.assume_init() };

        let os = c_field(&uts.sysname).to_lowercase();
        let release = c_field(&uts.release);
        let machine = c_field(&uts.machine);
        if os.is_empty() || release.is_empty() || machine.is_empty() {
            return None;
        }
        Some(Self {
            os,
            release,
            arch: node_arch(&machine),
        })
    }

    #[cfg(not(unix))]
    fn detect() -> Option<Self> {
        None
    }
}

#[cfg(unix)]
fn c_field(field: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&byte| byte != 0)
        .map(|&byte| byte as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Architecture names as the Netlify CLI reports them.
fn node_arch(machine: &str) -> &'static str {
    match machine.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" => "x64",
        "x86" | "i386" | "i686" => "ia32",
        "aarch64" | "arm64" => "arm64",
        "armv7l" | "armv6l" | "arm" => "arm",
        "ppc64le" | "ppc64" => "ppc64",
        "s390x" => "s390x",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::node_arch;

    #[test]
    fn machine_names_map_to_node_arch() {
        assert_eq!(node_arch("x86_64"), "x64");
        assert_eq!(node_arch("AARCH64"), "arm64");
        assert_eq!(node_arch("i686"), "ia32");
        assert_eq!(node_arch("mips"), "unknown");
    }
}
