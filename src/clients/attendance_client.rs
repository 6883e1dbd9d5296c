/// 考勤服务 API 客户端
///
/// 封装所有对考勤服务的 HTTP 调用，并把原始响应归类为
/// [`AttemptOutcome`] / [`RemoteError`]。
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::clients::AttendanceApi;
use crate::config::Config;
use crate::error::RemoteError;
use crate::models::{AttemptOutcome, RemoteCourse};

// 服务端业务码约定。与真实服务对接时只需调整这里，
// 分类结果的语义不变。
const CODE_SUCCESS: i64 = 1;
const CODE_WRONG_CODE: i64 = 2;
const CODE_SESSION_CLOSED: i64 = 3;
const CODE_AUTH_EXPIRED: i64 = 401;
const CODE_RATE_LIMITED: i64 = 600;

/// 服务端统一响应信封
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// 考勤服务 API 客户端
pub struct AttendanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl AttendanceClient {
    /// 创建新的考勤客户端
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("构建 HTTP 客户端失败")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn cookie_header(credential: &str) -> String {
        format!("JSESSIONID={}", credential)
    }

    /// 把提交接口的响应信封归类为签到结果
    fn classify_submit(envelope: &ApiEnvelope) -> AttemptOutcome {
        match envelope.code {
            CODE_SUCCESS => AttemptOutcome::Accepted {
                message: envelope
                    .msg
                    .clone()
                    .unwrap_or_else(|| "签到成功".to_string()),
            },
            CODE_WRONG_CODE => AttemptOutcome::WrongCode,
            CODE_SESSION_CLOSED => AttemptOutcome::SessionClosed,
            CODE_AUTH_EXPIRED => AttemptOutcome::AuthExpired,
            CODE_RATE_LIMITED => AttemptOutcome::TransientError {
                reason: "请求过于频繁".to_string(),
            },
            other => AttemptOutcome::TransientError {
                reason: format!("未知业务码: {}", other),
            },
        }
    }
}

#[async_trait]
impl AttendanceApi for AttendanceClient {
    async fn fetch_courses(&self, credential: &str) -> Result<Vec<RemoteCourse>, RemoteError> {
        let url = format!("{}/api/attendance/todayCourses", self.base_url);
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();

        debug!("获取课程列表: {} (date={})", url, today);

        let response = self
            .http
            .get(&url)
            .query(&[("date", today.as_str())])
            .header(COOKIE, Self::cookie_header(credential))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RemoteError::InvalidCredential);
        }
        if !status.is_success() {
            return Err(RemoteError::Network(format!("HTTP 状态码 {}", status)));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| RemoteError::BadResponse(e.to_string()))?;

        match envelope.code {
            CODE_AUTH_EXPIRED => Err(RemoteError::InvalidCredential),
            CODE_SUCCESS => {
                // data 为空表示今天没有排课，返回空列表而不是错误
                let rows = match envelope.data {
                    None | Some(Value::Null) => Vec::new(),
                    Some(data) => serde_json::from_value::<Vec<RemoteCourse>>(data)
                        .map_err(|e| RemoteError::BadResponse(e.to_string()))?,
                };
                debug!("课程列表获取成功，共 {} 门课程", rows.len());
                Ok(rows)
            }
            other => Err(RemoteError::Network(format!(
                "服务返回业务码 {}: {}",
                other,
                envelope.msg.unwrap_or_default()
            ))),
        }
    }

    async fn submit_code(
        &self,
        credential: &str,
        plan_id: &str,
        attendance_id: &str,
        code: &str,
    ) -> AttemptOutcome {
        let url = format!("{}/api/attendance/signIn", self.base_url);
        let body = serde_json::json!({
            "coursePlanId": plan_id,
            "attendanceId": attendance_id,
            "signCode": code,
        });

        let response = match self
            .http
            .post(&url)
            .header(COOKIE, Self::cookie_header(credential))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            // 超时、连接失败等传输层错误都按瞬时故障处理
            Err(e) => {
                return AttemptOutcome::TransientError {
                    reason: e.to_string(),
                }
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return AttemptOutcome::AuthExpired;
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return AttemptOutcome::TransientError {
                reason: "请求过于频繁 (HTTP 429)".to_string(),
            };
        }
        if !status.is_success() {
            return AttemptOutcome::TransientError {
                reason: format!("HTTP 状态码 {}", status),
            };
        }

        match response.json::<ApiEnvelope>().await {
            Ok(envelope) => {
                debug!("提交签到码 {} -> 业务码 {}", code, envelope.code);
                Self::classify_submit(&envelope)
            }
            Err(e) => AttemptOutcome::TransientError {
                reason: format!("响应解析失败: {}", e),
            },
        }
    }
}
