//! # Attendance Sign In
//!
//! 课堂考勤自动签到核心库
//!
//! ## 架构设计
//!
//! 本系统采用分层架构，Web 前端只消费最上层的信封接口：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 对远端考勤服务的 HTTP 调用与响应归类
//! - `AttendanceApi` - 访问端口 trait，测试时可替换为内存实现
//! - `AttendanceClient` - reqwest 实现，凭证随每次调用传入
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个动作
//! - `CatalogService` - 拉取并规范化当天课程列表
//! - `SignInService` - 为一个课程提交恰好一个签到码
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/brute_force` - 暴力破解引擎，管理 worker 池、
//!   协作取消和精确计数
//! - `api/` - Web 层消费的统一信封接口
//!
//! ## 模块结构

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use api::AttendanceApp;
pub use clients::{AttendanceApi, AttendanceClient};
pub use config::Config;
pub use error::RemoteError;
pub use models::{
    AbortReason, AttemptOutcome, Course, CourseListResponse, RemoteCourse, SearchOutcome,
    SignInOutcome, SignInResponse,
};
pub use orchestrator::BruteForceEngine;
pub use services::{CatalogService, SignInService};
