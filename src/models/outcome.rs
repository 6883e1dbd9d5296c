/// 单次提交的分类结果
///
/// 所有上层决策（继续 / 终止 / 成功）都只依据这个枚举，
/// 不再对服务端的提示文本做子串匹配。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 签到成功，携带服务端的提示语
    Accepted { message: String },
    /// 凭证有效但签到码错误
    WrongCode,
    /// 签到已结束，不再接受提交
    SessionClosed,
    /// 凭证无效或已过期
    AuthExpired,
    /// 瞬时故障（超时、连接失败、响应异常），本码不重试
    TransientError { reason: String },
}

/// 单次签到的结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInOutcome {
    /// 已发起提交并得到分类结果
    Attempted(AttemptOutcome),
    /// 课程缺少 planId / attendanceId，签到窗口未开放，未发起网络请求
    NotOpen,
}

/// 搜索终止原因
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    NotOpen,
    SessionClosed,
    AuthExpired,
}

impl AbortReason {
    pub fn message(&self) -> &'static str {
        match self {
            AbortReason::NotOpen => "签到尚未开始（缺少 Plan ID 或 Attendance ID）",
            AbortReason::SessionClosed => "签到已结束",
            AbortReason::AuthExpired => "JSESSIONID 已失效，请重新登录",
        }
    }
}

/// 暴力破解的最终结果，每次调用恰好产生一个
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 找到被接受的签到码
    Success { code: String, message: String },
    /// 整个码空间已尝试完毕，没有一个被接受
    Exhausted { attempts: usize },
    /// 出现终止信号，搜索提前结束
    Aborted { reason: AbortReason, attempts: usize },
}
