use serde::{Deserialize, Serialize};

/// 服务端返回的课程原始数据
///
/// 签到窗口尚未开放的课程，`coursePlanId` 和 `attendanceId` 均为空。
#[derive(Clone, Debug, Deserialize)]
pub struct RemoteCourse {
    #[serde(rename = "courseName")]
    pub course_name: String,
    #[serde(rename = "coursePlanId")]
    pub course_plan_id: Option<String>,
    #[serde(rename = "attendanceId")]
    pub attendance_id: Option<String>,
}

/// 课程
///
/// 由课程目录解析器生成的不可变值对象。`ui_id` 是本次列表内唯一的
/// 合成标识，供前端选择课程使用；核心不跨调用持有课程列表，
/// 列表由调用方自行缓存（JSON 序列化后存入其会话）。
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Course {
    pub ui_id: String,
    #[serde(rename = "courseName")]
    pub course_name: String,
    #[serde(rename = "coursePlanId")]
    pub course_plan_id: Option<String>,
    #[serde(rename = "attendanceId")]
    pub attendance_id: Option<String>,
}

impl Course {
    /// 返回签到所需的两个 ID；任一缺失说明签到窗口未开放
    pub fn attendance_ids(&self) -> Option<(&str, &str)> {
        match (&self.course_plan_id, &self.attendance_id) {
            (Some(plan), Some(att)) => Some((plan.as_str(), att.as_str())),
            _ => None,
        }
    }
}
