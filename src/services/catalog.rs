//! 课程目录解析 - 业务能力层
//!
//! 只负责"拉取并规范化当天课程列表"这一件事，不缓存任何结果，
//! 列表的生命周期完全由调用方管理。

use std::sync::Arc;

use tracing::info;

use crate::clients::AttendanceApi;
use crate::error::RemoteError;
use crate::models::Course;

/// 课程目录服务
pub struct CatalogService<C> {
    client: Arc<C>,
}

impl<C> Clone for CatalogService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: AttendanceApi> CatalogService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// 获取当天课程并赋予本次列表内唯一的 ui_id
    ///
    /// 服务端没有排课时返回空列表，不算错误；
    /// 凭证失效返回 [`RemoteError::InvalidCredential`]，
    /// 调用方必须据此要求用户重新登录，而不是当作"没有课程"。
    pub async fn list_courses(&self, credential: &str) -> Result<Vec<Course>, RemoteError> {
        let rows = self.client.fetch_courses(credential).await?;

        let courses: Vec<Course> = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Course {
                ui_id: format!("course-{}", i),
                course_name: row.course_name,
                course_plan_id: row.course_plan_id,
                attendance_id: row.attendance_id,
            })
            .collect();

        info!("✓ 获取到 {} 门课程", courses.len());
        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttemptOutcome, RemoteCourse};
    use async_trait::async_trait;

    struct FixedRemote {
        rows: Result<Vec<RemoteCourse>, RemoteError>,
    }

    #[async_trait]
    impl AttendanceApi for FixedRemote {
        async fn fetch_courses(&self, _credential: &str) -> Result<Vec<RemoteCourse>, RemoteError> {
            match &self.rows {
                Ok(rows) => Ok(rows.clone()),
                Err(RemoteError::InvalidCredential) => Err(RemoteError::InvalidCredential),
                Err(RemoteError::Network(e)) => Err(RemoteError::Network(e.clone())),
                Err(RemoteError::BadResponse(e)) => Err(RemoteError::BadResponse(e.clone())),
            }
        }

        async fn submit_code(
            &self,
            _credential: &str,
            _plan_id: &str,
            _attendance_id: &str,
            _code: &str,
        ) -> AttemptOutcome {
            unreachable!("课程目录服务不应提交签到码")
        }
    }

    fn row(name: &str) -> RemoteCourse {
        RemoteCourse {
            course_name: name.to_string(),
            course_plan_id: Some("plan".to_string()),
            attendance_id: None,
        }
    }

    #[tokio::test]
    async fn assigns_unique_monotonic_ui_ids() {
        let service = CatalogService::new(Arc::new(FixedRemote {
            rows: Ok(vec![row("语文"), row("数学"), row("英语")]),
        }));

        let courses = service.list_courses("sess").await.unwrap();
        let ids: Vec<&str> = courses.iter().map(|c| c.ui_id.as_str()).collect();
        assert_eq!(ids, vec!["course-0", "course-1", "course-2"]);
        assert_eq!(courses[1].course_name, "数学");
    }

    #[tokio::test]
    async fn empty_listing_is_not_an_error() {
        let service = CatalogService::new(Arc::new(FixedRemote { rows: Ok(vec![]) }));
        let courses = service.list_courses("sess").await.unwrap();
        assert!(courses.is_empty());
    }

    #[tokio::test]
    async fn invalid_credential_surfaces_distinctly() {
        let service = CatalogService::new(Arc::new(FixedRemote {
            rows: Err(RemoteError::InvalidCredential),
        }));
        let err = service.list_courses("stale").await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidCredential));
    }
}
