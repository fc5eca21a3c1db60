//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the native test runner:
//! the failure model, the framework facades, executable discovery, the suite
//! handle and the case runner.
//!
//! 此模块包含原生测试运行器的核心功能：
//! 失败模型、测试框架外观、可执行文件发现、测试套件句柄和用例运行器。

pub mod config;
pub mod discovery;
pub mod error;
pub mod execution;
pub mod facade;
pub mod models;
pub mod suite;

// Re-exports
pub use config::RunnerConfig;
pub use discovery::Discoverer;
pub use error::{Error, Result};
pub use models::{CaseId, Failure, Outcome};
pub use suite::{TestCase, TestSuite};
