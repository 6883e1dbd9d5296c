//! 暴力破解引擎 - 编排层
//!
//! ## 职责
//!
//! 驱动固定大小的 worker 池并发地把 0000-9999 码空间交给单次签到服务，
//! 并保证：
//!
//! 1. **先到先得**：第一个收到"签到成功"的 worker 记录获胜码，
//!    其余全部协作取消，此后不再发起新的提交
//! 2. **整体终止信号**：任何 worker 收到"签到已结束"或"凭证失效"，
//!    整个搜索立即终止，而不只是该 worker
//! 3. **精确计数**：每发起一次提交计数器恰好加一，
//!    未认领的候选码不计入
//! 4. **有界并发**：worker 池大小即出站请求上限，没有无界扇出

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::clients::AttendanceApi;
use crate::models::{AbortReason, AttemptOutcome, Course, SearchOutcome, SignInOutcome};
use crate::services::sign_in::format_code;
use crate::services::SignInService;

/// 码空间大小：0000-9999
const CODE_SPACE: u32 = 10_000;

/// 每尝试多少次输出一条进度日志
const PROGRESS_INTERVAL: usize = 1_000;

/// 搜索的终止信号，整个搜索恰好写入一次（先写者胜）
#[derive(Debug)]
enum Terminal {
    Success { code: String, message: String },
    Abort(AbortReason),
}

/// worker 之间共享的协调状态
///
/// cursor / stop / attempts 只做短暂的原子更新，从不跨网络调用持有。
struct Shared {
    /// 下一个未认领的候选码
    cursor: AtomicU32,
    /// 协作取消信号：认领候选码前、处理完成的结果前都要检查
    stop: AtomicBool,
    /// 已发起的提交次数
    attempts: AtomicUsize,
    /// 终止结果槽，后写者直接被丢弃
    terminal: OnceLock<Terminal>,
}

impl Shared {
    fn new() -> Self {
        Self {
            cursor: AtomicU32::new(0),
            stop: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
            terminal: OnceLock::new(),
        }
    }

    /// 写入终止信号并通知所有 worker 停止
    fn finish(&self, terminal: Terminal) {
        let _ = self.terminal.set(terminal);
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// 暴力破解引擎
pub struct BruteForceEngine<C> {
    sign_in: SignInService<C>,
    concurrency: usize,
}

impl<C: AttendanceApi + 'static> BruteForceEngine<C> {
    pub fn new(sign_in: SignInService<C>, concurrency: usize) -> Self {
        Self {
            sign_in,
            concurrency: concurrency.max(1),
        }
    }

    /// 对整个码空间做穷举搜索，恰好返回一个终止结果
    pub async fn search(&self, credential: &str, course: &Course) -> SearchOutcome {
        if course.attendance_ids().is_none() {
            warn!(
                "课程“{}”缺少 Plan ID 或 Attendance ID，无法开始暴力破解",
                course.course_name
            );
            return SearchOutcome::Aborted {
                reason: AbortReason::NotOpen,
                attempts: 0,
            };
        }

        info!(
            "🚀 开始暴力破解: 课程“{}”，码空间 {}，并发 {}",
            course.course_name, CODE_SPACE, self.concurrency
        );

        let shared = Arc::new(Shared::new());
        let worker_count = self.concurrency.min(CODE_SPACE as usize);

        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let sign_in = self.sign_in.clone();
            let shared = Arc::clone(&shared);
            let credential = credential.to_string();
            let course = course.clone();

            handles.push(tokio::spawn(async move {
                worker_loop(&sign_in, &shared, &credential, &course).await;
            }));
        }

        // 停止信号发出后，在途请求受单次超时约束，join 不会无限等待
        join_all(handles).await;

        let attempts = shared.attempts.load(Ordering::SeqCst);
        match shared.terminal.get() {
            Some(Terminal::Success { code, message }) => {
                info!("✅ 签到成功！签到码: {} (共尝试 {} 次)", code, attempts);
                SearchOutcome::Success {
                    code: code.clone(),
                    message: message.clone(),
                }
            }
            Some(Terminal::Abort(reason)) => {
                warn!("⛔ 搜索中止: {} (共尝试 {} 次)", reason.message(), attempts);
                SearchOutcome::Aborted {
                    reason: *reason,
                    attempts,
                }
            }
            None => {
                warn!("❌ 码空间已穷尽，没有签到码被接受 (共尝试 {} 次)", attempts);
                SearchOutcome::Exhausted { attempts }
            }
        }
    }
}

/// 单个 worker 的主循环
///
/// 不断认领下一个候选码并提交，直到码空间耗尽或停止信号出现。
async fn worker_loop<C: AttendanceApi>(
    sign_in: &SignInService<C>,
    shared: &Shared,
    credential: &str,
    course: &Course,
) {
    loop {
        if shared.stop.load(Ordering::SeqCst) {
            break;
        }

        let next = shared.cursor.fetch_add(1, Ordering::SeqCst);
        if next >= CODE_SPACE {
            break;
        }
        let code = next as u16;

        // 计数在发起提交之前，保证计数值 == 实际发出的提交数
        let attempt_no = shared.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt_no % PROGRESS_INTERVAL == 0 {
            info!("⏳ 已尝试 {} / {}", attempt_no, CODE_SPACE);
        }

        let outcome = sign_in.attempt(credential, course, code).await;

        // 停止信号在请求期间出现时，迟到的结果只计数，不参与结果判定
        if shared.stop.load(Ordering::SeqCst) {
            break;
        }

        match outcome {
            SignInOutcome::Attempted(AttemptOutcome::Accepted { message }) => {
                shared.finish(Terminal::Success {
                    code: format_code(code),
                    message,
                });
                break;
            }
            SignInOutcome::Attempted(AttemptOutcome::SessionClosed) => {
                shared.finish(Terminal::Abort(AbortReason::SessionClosed));
                break;
            }
            SignInOutcome::Attempted(AttemptOutcome::AuthExpired) => {
                shared.finish(Terminal::Abort(AbortReason::AuthExpired));
                break;
            }
            SignInOutcome::NotOpen => {
                shared.finish(Terminal::Abort(AbortReason::NotOpen));
                break;
            }
            SignInOutcome::Attempted(AttemptOutcome::WrongCode) => {}
            // 瞬时故障不在本次搜索内重试，该码按已尝试处理
            SignInOutcome::Attempted(AttemptOutcome::TransientError { reason }) => {
                debug!("签到码 {} 瞬时故障: {}", format_code(code), reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::models::RemoteCourse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 按候选码脚本化应答的内存远端，记录全部提交
    struct ScriptedRemote<F> {
        respond: F,
        calls: AtomicUsize,
        seen: Mutex<Vec<u16>>,
        accept_observed: AtomicBool,
        calls_after_accept: AtomicUsize,
    }

    impl<F> ScriptedRemote<F>
    where
        F: Fn(u16) -> AttemptOutcome + Send + Sync,
    {
        fn new(respond: F) -> Self {
            Self {
                respond,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                accept_observed: AtomicBool::new(false),
                calls_after_accept: AtomicUsize::new(0),
            }
        }

        fn duplicate_codes(&self) -> Vec<u16> {
            let seen = self.seen.lock().unwrap();
            let mut counts: HashMap<u16, usize> = HashMap::new();
            for code in seen.iter() {
                *counts.entry(*code).or_default() += 1;
            }
            counts
                .into_iter()
                .filter(|(_, n)| *n > 1)
                .map(|(c, _)| c)
                .collect()
        }
    }

    #[async_trait]
    impl<F> AttendanceApi for ScriptedRemote<F>
    where
        F: Fn(u16) -> AttemptOutcome + Send + Sync,
    {
        async fn fetch_courses(&self, _credential: &str) -> Result<Vec<RemoteCourse>, RemoteError> {
            Ok(vec![])
        }

        async fn submit_code(
            &self,
            _credential: &str,
            _plan_id: &str,
            _attendance_id: &str,
            code: &str,
        ) -> AttemptOutcome {
            if self.accept_observed.load(Ordering::SeqCst) {
                self.calls_after_accept.fetch_add(1, Ordering::SeqCst);
            }
            self.calls.fetch_add(1, Ordering::SeqCst);

            let code: u16 = code.parse().expect("提交的签到码应当是数字");
            self.seen.lock().unwrap().push(code);

            let outcome = (self.respond)(code);
            if matches!(outcome, AttemptOutcome::Accepted { .. }) {
                self.accept_observed.store(true, Ordering::SeqCst);
            }
            outcome
        }
    }

    fn open_course() -> Course {
        Course {
            ui_id: "course-0".into(),
            course_name: "操作系统".into(),
            course_plan_id: Some("plan-1".into()),
            attendance_id: Some("att-1".into()),
        }
    }

    fn engine_with<F>(
        remote: Arc<ScriptedRemote<F>>,
        concurrency: usize,
    ) -> BruteForceEngine<ScriptedRemote<F>>
    where
        F: Fn(u16) -> AttemptOutcome + Send + Sync + 'static,
    {
        BruteForceEngine::new(SignInService::new(remote), concurrency)
    }

    fn accept_only(planted: u16) -> impl Fn(u16) -> AttemptOutcome + Send + Sync {
        move |code| {
            if code == planted {
                AttemptOutcome::Accepted {
                    message: "签到成功".to_string(),
                }
            } else {
                AttemptOutcome::WrongCode
            }
        }
    }

    #[tokio::test]
    async fn planted_code_is_found_for_pool_sizes_1_10_100() {
        for concurrency in [1usize, 10, 100] {
            let remote = Arc::new(ScriptedRemote::new(accept_only(4321)));
            let engine = engine_with(Arc::clone(&remote), concurrency);

            let outcome = engine.search("sess", &open_course()).await;

            assert_eq!(
                outcome,
                SearchOutcome::Success {
                    code: "4321".to_string(),
                    message: "签到成功".to_string()
                },
                "并发 {} 时应找到植入的签到码",
                concurrency
            );
            let calls = remote.calls.load(Ordering::SeqCst);
            assert!(calls <= CODE_SPACE as usize);
            // 成功被观察到之后不得再发起新的提交
            assert_eq!(remote.calls_after_accept.load(Ordering::SeqCst), 0);
            assert!(remote.duplicate_codes().is_empty());
        }
    }

    #[tokio::test]
    async fn auth_expired_on_first_attempt_aborts_with_count_one() {
        let remote = Arc::new(ScriptedRemote::new(|_| AttemptOutcome::AuthExpired));
        let engine = engine_with(Arc::clone(&remote), 1);

        let outcome = engine.search("stale", &open_course()).await;

        assert_eq!(
            outcome,
            SearchOutcome::Aborted {
                reason: AbortReason::AuthExpired,
                attempts: 1
            }
        );
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_wrong_codes_exhaust_space_exactly_once_each() {
        let remote = Arc::new(ScriptedRemote::new(|_| AttemptOutcome::WrongCode));
        let engine = engine_with(Arc::clone(&remote), 10);

        let outcome = engine.search("sess", &open_course()).await;

        assert_eq!(
            outcome,
            SearchOutcome::Exhausted {
                attempts: CODE_SPACE as usize
            }
        );
        assert_eq!(remote.calls.load(Ordering::SeqCst), CODE_SPACE as usize);
        assert_eq!(remote.seen.lock().unwrap().len(), CODE_SPACE as usize);
        assert!(remote.duplicate_codes().is_empty());
    }

    #[tokio::test]
    async fn transient_errors_are_skipped_not_retried() {
        let remote = Arc::new(ScriptedRemote::new(|code| {
            if code < 50 {
                AttemptOutcome::TransientError {
                    reason: "超时".to_string(),
                }
            } else if code == 77 {
                AttemptOutcome::Accepted {
                    message: "签到成功".to_string(),
                }
            } else {
                AttemptOutcome::WrongCode
            }
        }));
        let engine = engine_with(Arc::clone(&remote), 10);

        let outcome = engine.search("sess", &open_course()).await;

        assert!(matches!(
            outcome,
            SearchOutcome::Success { ref code, .. } if code == "0077"
        ));
        // 瞬时故障的码只尝试一次
        assert!(remote.duplicate_codes().is_empty());
    }

    #[tokio::test]
    async fn session_closed_mid_search_aborts_whole_search() {
        let remote = Arc::new(ScriptedRemote::new(|code| {
            if code == 500 {
                AttemptOutcome::SessionClosed
            } else {
                AttemptOutcome::WrongCode
            }
        }));
        let engine = engine_with(Arc::clone(&remote), 10);

        let outcome = engine.search("sess", &open_course()).await;

        let SearchOutcome::Aborted { reason, attempts } = &outcome else {
            panic!("应当以 Aborted 终止，实际: {:?}", outcome);
        };
        assert_eq!(*reason, AbortReason::SessionClosed);
        // 报告的计数与实际发出的提交数一致
        assert_eq!(*attempts, remote.calls.load(Ordering::SeqCst));
        assert!(*attempts < CODE_SPACE as usize);
    }

    #[tokio::test]
    async fn course_without_ids_never_reaches_remote() {
        let remote = Arc::new(ScriptedRemote::new(|_| AttemptOutcome::WrongCode));
        let engine = engine_with(Arc::clone(&remote), 10);

        let course = Course {
            course_plan_id: None,
            attendance_id: None,
            ..open_course()
        };
        let outcome = engine.search("sess", &course).await;

        assert_eq!(
            outcome,
            SearchOutcome::Aborted {
                reason: AbortReason::NotOpen,
                attempts: 0
            }
        );
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }
}
