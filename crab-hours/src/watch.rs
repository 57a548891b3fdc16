//! 门店状态轮询
//!
//! 按固定间隔重新读取营业时间并计算状态，
//! 状态变化 (开门/休息/关门) 时记录日志。
//! 每次轮询都重新读取数据，不做缓存。

use std::time::Duration;

use chrono_tz::Tz;
use shared::error::AppResult;
use shared::models::{ServiceType, StoreStatus};
use tokio_util::sync::CancellationToken;

use crate::store::{ScheduleSource, status_from_source};
use crate::utils::time::{self, Clock, SystemClock};

/// 状态轮询器
pub struct StatusWatcher<S, C = SystemClock> {
    source: S,
    service: ServiceType,
    tz: Tz,
    interval: Duration,
    clock: C,
    shutdown: CancellationToken,
}

impl<S: ScheduleSource> StatusWatcher<S> {
    pub fn new(
        source: S,
        service: ServiceType,
        tz: Tz,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            source,
            service,
            tz,
            interval,
            clock: SystemClock,
            shutdown,
        }
    }
}

impl<S: ScheduleSource, C: Clock> StatusWatcher<S, C> {
    /// 替换时钟来源 (测试用)
    pub fn with_clock<C2: Clock>(self, clock: C2) -> StatusWatcher<S, C2> {
        StatusWatcher {
            source: self.source,
            service: self.service,
            tz: self.tz,
            interval: self.interval,
            clock,
            shutdown: self.shutdown,
        }
    }

    /// 读取最新数据并计算一次状态
    pub fn poll_once(&self) -> AppResult<StoreStatus> {
        let now = time::to_store_local(self.clock.now(), self.tz);
        status_from_source(&self.source, now, self.service)
    }

    /// 主循环：定时轮询 + 关机信号
    ///
    /// 返回最后一次成功计算的状态
    pub async fn run(self) -> Option<StoreStatus> {
        tracing::info!(
            service_type = %self.service,
            timezone = %self.tz,
            interval_secs = self.interval.as_secs(),
            "Store status watcher started"
        );

        let mut last: Option<StoreStatus> = None;
        loop {
            match self.poll_once() {
                Ok(status) => {
                    if has_changed(last.as_ref(), &status) {
                        tracing::info!(
                            is_open = status.is_open,
                            reason = status.reason.as_str(),
                            next_open = status.next_open_hint.as_deref().unwrap_or("-"),
                            "Store status: {}",
                            status.message
                        );
                    }
                    last = Some(status);
                }
                Err(e) => {
                    // 保留上一次状态，下个周期重试
                    tracing::warn!(
                        error = %e,
                        category = e.category().name(),
                        "Failed to refresh store status"
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Store status watcher received shutdown signal");
                    return last;
                }
            }
        }
    }
}

/// 开关状态或原因变化才算变化，消息文本变化不算
fn has_changed(previous: Option<&StoreStatus>, current: &StoreStatus) -> bool {
    previous.is_none_or(|p| p.is_open != current.is_open || p.reason != current.reason)
}
