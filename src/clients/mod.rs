//! 考勤服务客户端
//!
//! 负责所有与远端考勤服务的交互

pub mod attendance_client;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::models::{AttemptOutcome, RemoteCourse};

pub use attendance_client::AttendanceClient;

/// 考勤服务访问端口
///
/// 服务层与搜索引擎只依赖该 trait，测试时可以换成内存实现。
/// 凭证在每次调用时原样传入，客户端自身不保存任何状态。
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// 获取当天的课程列表
    async fn fetch_courses(&self, credential: &str) -> Result<Vec<RemoteCourse>, RemoteError>;

    /// 提交一个签到码并返回分类结果
    ///
    /// 客户端不做任何重试，重试策略属于调用方。
    async fn submit_code(
        &self,
        credential: &str,
        plan_id: &str,
        attendance_id: &str,
        code: &str,
    ) -> AttemptOutcome;
}
