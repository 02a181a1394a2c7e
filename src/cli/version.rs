use std::fmt;

/// Build metadata baked in by `build.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub full_git_sha: &'static str,
    pub short_git_sha: &'static str,
    pub date: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub const fn from_build_env() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            full_git_sha: env!("GPM_GIT_SHA"),
            short_git_sha: env!("GPM_GIT_SHORT_SHA"),
            date: env!("GPM_BUILD_DATE"),
            rustc_version: env!("GPM_RUSTC_VERSION"),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Version: {}, {}\nBuild Date: {}\nRust Version: {}",
            self.version, self.full_git_sha, self.date, self.rustc_version
        )
    }
}

/// `version`, `-version` and `-v` as the first argument ask for build info.
pub fn is_version_request<S: AsRef<str>>(args: &[S]) -> bool {
    matches!(
        args.get(1).map(AsRef::as_ref),
        Some("version" | "-version" | "-v")
    )
}

pub fn print_version(info: &BuildInfo) {
    println!("{info}");
}
