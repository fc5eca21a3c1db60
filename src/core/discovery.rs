//! # Discovery Coordinator Module / 发现协调模块
//!
//! Decides whether a path is a test executable of a supported framework and,
//! if so, binds it to the facade that claimed it.
//!
//! A path is declined, never reported as an error, when it is not executable
//! (including when it cannot be stat'ed or has disappeared), when it matches no
//! file mask and was not named explicitly, or when no facade claims it.
//!
//! 判断一个路径是否为受支持框架的测试可执行文件，如果是，则将其绑定到认领它的外观。
//! 当路径不可执行（包括无法获取状态或已消失）、不匹配任何文件掩码且未被显式指定，
//! 或没有外观认领它时，该路径会被拒绝，而不会报告为错误。

use crate::core::config::RunnerConfig;
use crate::core::error::{Error, Result};
use crate::core::facade::{self, Facade};
use crate::core::suite::{ExecutableDescriptor, TestSuite};
use crate::infra::{command, fs};
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Binds executables to facades. Holds its configuration immutably, so one
/// instance can serve concurrent discoveries.
/// 将可执行文件绑定到外观。以不可变方式持有配置，因此一个实例可以服务于并发发现。
#[derive(Debug, Clone)]
pub struct Discoverer {
    masks: Vec<Pattern>,
    arguments: Vec<String>,
    emulator: Vec<String>,
    probe_timeout: Duration,
    run_timeout: Option<Duration>,
    facades: Vec<Arc<dyn Facade>>,
}

impl Discoverer {
    /// Creates a discoverer with the supported facades in their fixed order.
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        Self::with_facades(config, facade::default_facades())
    }

    /// Creates a discoverer that asks `facades` in the given order.
    /// 创建一个按给定顺序询问 `facades` 的发现器。
    pub fn with_facades(config: &RunnerConfig, facades: Vec<Arc<dyn Facade>>) -> Result<Self> {
        let masks = config
            .effective_masks()
            .into_iter()
            .map(compile_mask)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            masks,
            arguments: config.arguments.clone(),
            emulator: config.emulator.clone(),
            probe_timeout: config.probe_timeout(),
            run_timeout: config.run_timeout(),
            facades,
        })
    }

    /// Returns `true` if `path` matches at least one file mask. Masks without
    /// a `/` are matched against the file name, others against the whole path.
    /// A relative mask with a `/` may match at any depth, so `build/*` matches
    /// both `./build/test_x` and `/src/proj/build/test_x`.
    /// 如果 `path` 匹配至少一个文件掩码则返回 `true`。
    pub fn matches_masks(&self, path: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let normalized: PathBuf = path
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect();
        let file_name = path.file_name().map(Path::new);
        self.masks.iter().any(|mask| {
            if mask.as_str().contains('/') {
                mask.matches_path_with(&normalized, options)
            } else {
                file_name.is_some_and(|name| mask.matches_path_with(name, options))
            }
        })
    }

    /// Discovers the test suite at `path`, or declines with `None`.
    ///
    /// `explicit` marks a path the user named directly; it bypasses the file
    /// masks. Facades are asked in order and the first one that claims the
    /// executable owns it; later facades are not asked.
    ///
    /// 发现 `path` 处的测试套件，或以 `None` 拒绝。
    /// `explicit` 标记用户直接指定的路径；它会跳过文件掩码。
    /// 外观按顺序被询问，第一个认领可执行文件的外观拥有它；后面的外观不会被询问。
    pub async fn discover(&self, path: &Path, explicit: bool) -> Option<TestSuite> {
        if !fs::is_executable(path) {
            tracing::trace!(path = %path.display(), "declined: not executable");
            return None;
        }
        if !explicit && !self.matches_masks(path) {
            tracing::trace!(path = %path.display(), "declined: no mask matches");
            return None;
        }
        let path = match std::path::absolute(path) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(path = %path.display(), "declined: cannot resolve path: {e}");
                return None;
            }
        };

        for facade in &self.facades {
            if self.probe(facade.as_ref(), &path).await {
                tracing::debug!(path = %path.display(), framework = facade.name(), "claimed");
                return Some(TestSuite::new(ExecutableDescriptor {
                    path,
                    facade: Arc::clone(facade),
                    arguments: self.arguments.clone(),
                    emulator: self.emulator.clone(),
                    timeout: self.run_timeout,
                }));
            }
        }
        tracing::debug!(path = %path.display(), "declined: no facade claims it");
        None
    }

    /// Runs the facade's probe. An executable that cannot be started or does
    /// not answer within the probe timeout is not claimed.
    async fn probe(&self, facade: &dyn Facade, path: &Path) -> bool {
        let cmd = command::build_command(&self.emulator, path, facade.probe_args());
        match command::spawn_and_capture(cmd, Some(self.probe_timeout)).await {
            Ok(probe) => facade.is_test_suite(&probe),
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    framework = facade.name(),
                    "probe failed to start: {e}"
                );
                false
            }
        }
    }
}

/// Compiles one configured mask. Relative masks containing a `/` are anchored
/// at any directory depth.
fn compile_mask(mask: String) -> Result<Pattern> {
    let anchored = if mask.contains('/') && !mask.starts_with('/') && !mask.starts_with("**/") {
        format!("**/{mask}")
    } else {
        mask.clone()
    };
    Pattern::new(&anchored).map_err(|source| Error::InvalidMask { mask, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discoverer(masks: &[&str]) -> Discoverer {
        let config = RunnerConfig {
            masks: masks.iter().map(|m| m.to_string()).collect(),
            ..RunnerConfig::default()
        };
        Discoverer::new(&config).unwrap()
    }

    #[test]
    fn default_masks_match_prefix_and_suffix() {
        let d = discoverer(&[]);
        assert!(d.matches_masks(Path::new("build/test_math")));
        assert!(d.matches_masks(Path::new("build/math_test")));
        assert!(!d.matches_masks(Path::new("build/math")));
        assert!(!d.matches_masks(Path::new("test_dir/math")));
    }

    #[test]
    fn masks_with_separator_match_whole_path() {
        let d = discoverer(&["build/*"]);
        assert!(d.matches_masks(Path::new("build/anything")));
        assert!(!d.matches_masks(Path::new("other/anything")));
    }

    #[test]
    fn path_masks_match_walked_and_absolute_paths() {
        let d = discoverer(&["build/*"]);
        assert!(d.matches_masks(Path::new("./build/test_x")));
        assert!(d.matches_masks(Path::new("/src/proj/build/test_x")));
        assert!(!d.matches_masks(Path::new("./other/test_x")));
        assert!(!d.matches_masks(Path::new("./build/sub/test_x")));
    }

    #[test]
    fn absolute_masks_stay_anchored() {
        let d = discoverer(&["/opt/tests/*"]);
        assert!(d.matches_masks(Path::new("/opt/tests/math")));
        assert!(!d.matches_masks(Path::new("/home/opt/tests/math")));
    }

    #[test]
    fn invalid_mask_is_a_configuration_error() {
        let config = RunnerConfig {
            masks: vec!["[".to_string()],
            ..RunnerConfig::default()
        };
        assert!(matches!(Discoverer::new(&config), Err(Error::InvalidMask { .. })));
    }

    #[tokio::test]
    async fn vanished_path_is_declined_even_when_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let d = discoverer(&[]);
        assert!(d.discover(&dir.path().join("test_gone"), true).await.is_none());
    }
}
