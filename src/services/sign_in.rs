//! 单次签到 - 业务能力层
//!
//! 为一个课程提交恰好一个候选码并返回分类结果。
//! 不重试、不循环，这是暴力破解引擎并行化的工作单元。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::AttendanceApi;
use crate::models::{Course, SignInOutcome};

/// 把候选码格式化为提交用的 4 位补零字符串
pub fn format_code(code: u16) -> String {
    format!("{:04}", code)
}

/// 单次签到服务
pub struct SignInService<C> {
    client: Arc<C>,
}

impl<C> Clone for SignInService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: AttendanceApi> SignInService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// 为指定课程提交一个候选码
    ///
    /// 课程缺少 planId / attendanceId 时直接返回 [`SignInOutcome::NotOpen`]，
    /// 不发起任何网络请求。
    pub async fn attempt(&self, credential: &str, course: &Course, code: u16) -> SignInOutcome {
        let Some((plan_id, attendance_id)) = course.attendance_ids() else {
            warn!(
                "课程“{}”缺少 Plan ID 或 Attendance ID，签到尚未开始",
                course.course_name
            );
            return SignInOutcome::NotOpen;
        };

        let formatted = format_code(code);
        debug!("提交签到码 {} (课程: {})", formatted, course.course_name);

        let outcome = self
            .client
            .submit_code(credential, plan_id, attendance_id, &formatted)
            .await;

        SignInOutcome::Attempted(outcome)
    }
}
