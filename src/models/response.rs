use serde::Serialize;

use crate::models::Course;

/// 课程列表接口的统一返回结构
///
/// Web 层只负责渲染 `error` 并缓存 `courses`。
#[derive(Clone, Debug, Serialize)]
pub struct CourseListResponse {
    pub success: bool,
    pub courses: Vec<Course>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CourseListResponse {
    pub fn ok(courses: Vec<Course>) -> Self {
        Self {
            success: true,
            courses,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            courses: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// 签到接口的统一返回结构
#[derive(Clone, Debug, Serialize)]
pub struct SignInResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<usize>,
}

impl SignInResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            attempts: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            attempts: None,
        }
    }

    pub fn err_with_attempts(error: impl Into<String>, attempts: usize) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            attempts: Some(attempts),
        }
    }
}
