//! 设备快照服务
//!
//! 每个轮询周期恰好一次客户端调用，产出一份不可变快照
//! （MAC → 归一化设备）。轮询失败保留上一份快照，重试节奏由
//! 外层调度循环决定。从某次响应中消失的设备直接从快照消失，
//! 没有删除逻辑。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::NormalizedDevice;
use crate::services::GoveeClient;

/// 单个轮询周期产出的不可变快照
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub devices: HashMap<String, NormalizedDevice>,
    pub updated_at: DateTime<Utc>,
}

/// 快照服务：持有客户端与当前快照
pub struct SnapshotService {
    client: GoveeClient,
    scan_interval: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl SnapshotService {
    pub fn new(client: GoveeClient, scan_interval_seconds: u64) -> Self {
        Self {
            client,
            scan_interval: Duration::from_secs(scan_interval_seconds),
            snapshot: RwLock::new(None),
        }
    }

    /// 执行一次拉取并替换快照
    pub async fn refresh(&self) -> Result<usize, AppError> {
        let devices = self.client.get_devices().await?;

        let map: HashMap<String, NormalizedDevice> = devices
            .into_iter()
            .map(|d| (d.mac.clone(), d))
            .collect();
        let count = map.len();

        let mut guard = self.snapshot.write().await;
        *guard = Some(Snapshot {
            devices: map,
            updated_at: Utc::now(),
        });

        tracing::debug!(count, "设备快照已更新");
        Ok(count)
    }

    /// 配置校验：拉取一次，账户下没有设备视为硬性配置错误
    ///
    /// 仅用于启动/配置流程；运行期轮询到空结果只记录日志。
    pub async fn validate(&self) -> Result<usize, AppError> {
        let count = self.refresh().await?;
        if count == 0 {
            return Err(AppError::ConfigError(
                "Govee 账户下没有温湿度设备".to_string(),
            ));
        }
        Ok(count)
    }

    /// 当前快照中的全部设备；尚无快照时内联刷新一次
    pub async fn devices(&self) -> Result<Vec<NormalizedDevice>, AppError> {
        self.ensure_snapshot().await?;

        let guard = self.snapshot.read().await;
        let snapshot = guard
            .as_ref()
            .ok_or_else(|| AppError::InternalError("快照缺失".to_string()))?;

        let mut devices: Vec<NormalizedDevice> = snapshot.devices.values().cloned().collect();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(devices)
    }

    /// 按展示名查找设备，不存在返回 404
    pub async fn device_by_name(&self, name: &str) -> Result<NormalizedDevice, AppError> {
        let devices = self.devices().await?;
        devices
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| AppError::NotFound(format!("设备不存在: {}", name)))
    }

    /// 最近一次成功轮询时间
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.as_ref().map(|s| s.updated_at)
    }

    /// 当前快照中的设备数
    pub async fn device_count(&self) -> usize {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(|s| s.devices.len())
            .unwrap_or(0)
    }

    async fn ensure_snapshot(&self) -> Result<(), AppError> {
        if self.snapshot.read().await.is_some() {
            return Ok(());
        }
        self.refresh().await?;
        Ok(())
    }

    /// 启动后台轮询循环
    ///
    /// 失败只记录日志并保留旧快照；下一个周期自然形成重试。
    pub fn spawn_polling(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.scan_interval);
            // 首个 tick 立即触发，启动时已拉取过，跳过
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match self.refresh().await {
                    Ok(0) => tracing::warn!("本次轮询未发现设备"),
                    Ok(count) => tracing::debug!(count, "轮询完成"),
                    Err(AppError::AuthenticationFailed(msg)) => {
                        tracing::error!(error = %msg, "轮询认证失败，请更新访问令牌");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "轮询失败，保留上一份快照");
                    }
                }
            }
        })
    }
}
