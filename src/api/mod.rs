//! Web 层接口 - 编排层
//!
//! Web 前端只通过本模块与核心交互：登录时验证凭证并获取课程、
//! 刷新课程、手动签到、暴力破解签到。四个操作都返回统一的
//! success / error 信封，凭证与课程缓存的生命周期完全由调用方管理，
//! 核心在两次调用之间不持有任何状态。

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use regex::Regex;
use tracing::{info, warn};

use crate::clients::{AttendanceApi, AttendanceClient};
use crate::config::Config;
use crate::models::{
    AttemptOutcome, Course, CourseListResponse, SearchOutcome, SignInOutcome, SignInResponse,
};
use crate::orchestrator::BruteForceEngine;
use crate::services::{CatalogService, SignInService};

/// 校验手动输入的签到码：1-4 位数字，范围 [0, 9999]
fn parse_manual_code(raw: &str) -> Option<u16> {
    static CODE_RE: OnceLock<Regex> = OnceLock::new();
    let re = CODE_RE.get_or_init(|| Regex::new(r"^[0-9]{1,4}$").expect("签到码正则应当合法"));

    let trimmed = raw.trim();
    if !re.is_match(trimmed) {
        return None;
    }
    trimmed.parse().ok()
}

/// 应用主结构
///
/// 持有课程目录服务、单次签到服务和暴力破解引擎，
/// 是 Web 层唯一需要构造的对象。
pub struct AttendanceApp<C> {
    catalog: CatalogService<C>,
    sign_in: SignInService<C>,
    engine: BruteForceEngine<C>,
}

impl AttendanceApp<AttendanceClient> {
    /// 用真实的考勤客户端初始化应用
    pub fn new(config: &Config) -> Result<Self> {
        let client = Arc::new(AttendanceClient::new(config)?);
        Ok(Self::with_client(client, config))
    }
}

impl<C: AttendanceApi + 'static> AttendanceApp<C> {
    /// 用任意客户端实现初始化，测试时传入内存实现
    pub fn with_client(client: Arc<C>, config: &Config) -> Self {
        let sign_in = SignInService::new(Arc::clone(&client));
        Self {
            catalog: CatalogService::new(client),
            engine: BruteForceEngine::new(sign_in.clone(), config.max_concurrent_attempts),
            sign_in,
        }
    }

    /// 登录时验证凭证并获取当天课程
    ///
    /// 凭证失效时 `error` 会带有明确的重新登录提示，
    /// 调用方不得把它当作"没有课程"。
    pub async fn validate_and_list_courses(&self, credential: &str) -> CourseListResponse {
        match self.catalog.list_courses(credential).await {
            Ok(courses) => {
                if courses.is_empty() {
                    info!("今天没有找到课程");
                }
                CourseListResponse::ok(courses)
            }
            Err(e) => {
                warn!("获取课程失败: {}", e);
                CourseListResponse::err(e.to_string())
            }
        }
    }

    /// 重新拉取课程列表，调用方应先丢弃旧缓存
    pub async fn refresh_courses(&self, credential: &str) -> CourseListResponse {
        info!("🔄 正在刷新课程列表...");
        self.validate_and_list_courses(credential).await
    }

    /// 用调用方提供的签到码做一次手动签到
    ///
    /// 签到码必须是 1-4 位数字，否则不发起任何网络请求直接拒绝；
    /// 合法的码由核心补零成 4 位后提交。
    pub async fn sign_in_manual(
        &self,
        credential: &str,
        course: &Course,
        code: &str,
    ) -> SignInResponse {
        let Some(code) = parse_manual_code(code) else {
            return SignInResponse::err("输入的手动签到码无效。必须是 0000-9999。");
        };

        info!(
            "尝试使用签到码 {:04} 为“{}”签到...",
            code, course.course_name
        );

        match self.sign_in.attempt(credential, course, code).await {
            SignInOutcome::NotOpen => SignInResponse::err(format!(
                "无法为“{}”签到。签到可能尚未开始（缺少 Plan ID 或 Attendance ID）。请刷新。",
                course.course_name
            )),
            SignInOutcome::Attempted(AttemptOutcome::Accepted { message }) => {
                info!("✅ “{}”签到成功", course.course_name);
                SignInResponse::ok(message)
            }
            SignInOutcome::Attempted(AttemptOutcome::WrongCode) => {
                SignInResponse::err("签到码错误")
            }
            SignInOutcome::Attempted(AttemptOutcome::SessionClosed) => {
                SignInResponse::err("签到已结束")
            }
            SignInOutcome::Attempted(AttemptOutcome::AuthExpired) => {
                SignInResponse::err("JSESSIONID 已失效，请重新登录")
            }
            SignInOutcome::Attempted(AttemptOutcome::TransientError { reason }) => {
                SignInResponse::err(format!("请求失败: {}", reason))
            }
        }
    }

    /// 对选中课程做整个码空间的暴力破解签到
    pub async fn sign_in_brute_force(&self, credential: &str, course: &Course) -> SignInResponse {
        match self.engine.search(credential, course).await {
            SearchOutcome::Success { code, message } => {
                SignInResponse::ok(format!("签到成功，签到码为 {}。{}", code, message))
            }
            SearchOutcome::Exhausted { attempts } => SignInResponse::err_with_attempts(
                "已尝试整个码空间，没有签到码被接受",
                attempts,
            ),
            SearchOutcome::Aborted { reason, attempts } => {
                SignInResponse::err_with_attempts(reason.message(), attempts)
            }
        }
    }
}
