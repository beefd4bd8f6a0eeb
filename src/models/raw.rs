//! Govee 接口原始报文模型
//!
//! 外层设备列表 → 每设备 `deviceExt` 信封 → 两段独立 JSON 编码的
//! 字符串（`deviceSettings` / `lastDeviceData`）。两段字符串各自独立
//! 二次解析，任一缺失或格式损坏只影响自身，绝不影响同设备的其它
//! 字段或其它设备。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 设备列表响应顶层结构 `{ data: { devices: [...] } }`
///
/// `data` 或 `devices` 缺失时得到空列表而非错误。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceListResponse {
    #[serde(default)]
    pub data: DeviceListData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceListData {
    /// 每个元素保留为 Value，单条记录损坏时跳过该条而非整体失败
    #[serde(default)]
    pub devices: Vec<Value>,
}

/// 设备列表中的单条原始记录（接口驼峰命名）
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDeviceRecord {
    pub device_id: Option<i64>,
    pub group_id: Option<i64>,
    pub sku: Option<String>,
    /// MAC 地址，设备的唯一标识
    pub device: Option<String>,
    pub version_hard: Option<String>,
    pub version_soft: Option<String>,
    pub device_name: Option<String>,
    pub device_ext: Option<DeviceExt>,
}

/// 承载两段 JSON 编码字符串的信封
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceExt {
    pub device_settings: Option<String>,
    pub last_device_data: Option<String>,
    pub device_splice: Option<String>,
    pub ext_resources: Option<String>,
    pub shared_settings: Option<String>,
}

impl DeviceExt {
    /// 解析 deviceSettings 字符串，缺失或损坏返回 None
    pub fn parsed_device_settings(&self) -> Option<DeviceSettings> {
        self.device_settings
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| serde_json::from_str(s).ok())
    }

    /// 解析 lastDeviceData 字符串，缺失或损坏返回 None
    pub fn parsed_last_device_data(&self) -> Option<LastDeviceData> {
        self.last_device_data
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| serde_json::from_str(s).ok())
    }
}

/// deviceSettings 子文档：静态配置属性，全部可选
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSettings {
    pub device_type: Option<i64>,
    pub push_state: Option<bool>,
    pub tem_min: Option<i64>,
    pub tem_max: Option<i64>,
    pub tem_warning: Option<bool>,
    pub tem_cali: Option<i64>,
    pub hum_min: Option<i64>,
    pub hum_max: Option<i64>,
    pub hum_warning: Option<bool>,
    pub hum_cali: Option<i64>,
    pub battery: Option<i64>,
    pub wifi_level: Option<i64>,
    pub upload_rate: Option<i64>,
    pub power_save_mode_state: Option<bool>,
    pub fah_open: Option<bool>,
    /// 接口字段名拼写错误，原样保留
    #[serde(rename = "netWaring")]
    pub net_waring: Option<bool>,
    pub device_name: Option<String>,
    pub sku: Option<String>,
    pub device: Option<String>,
    pub version_hard: Option<String>,
    pub version_soft: Option<String>,
    pub gateway_id: Option<i64>,
}

/// lastDeviceData 子文档：实时遥测
///
/// `tem`/`hum` 为 0 是合法读数，与缺失语义不同。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastDeviceData {
    pub online: Option<bool>,
    /// 温度，百分之一摄氏度（2160 = 21.6°C）
    #[serde(deserialize_with = "lenient_int")]
    pub tem: Option<i64>,
    /// 湿度，百分之一个百分点（5500 = 55.0%）
    #[serde(deserialize_with = "lenient_int")]
    pub hum: Option<i64>,
    pub last_time: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub avg_day_tem: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub avg_day_hum: Option<i64>,
}

/// 宽容整数反序列化：接受整数、浮点、数字字符串，其余归为缺失
///
/// 单个读数损坏只丢弃该读数，不能拖垮整个子文档。
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_ext_parses_both_blobs() {
        let ext = DeviceExt {
            device_settings: Some(r#"{"battery":88,"temWarning":false}"#.to_string()),
            last_device_data: Some(r#"{"online":true,"tem":2160,"hum":5500}"#.to_string()),
            ..Default::default()
        };

        let settings = ext.parsed_device_settings().expect("应能解析设置");
        assert_eq!(settings.battery, Some(88));
        assert_eq!(settings.tem_warning, Some(false), "false 应与缺失可区分");

        let data = ext.parsed_last_device_data().expect("应能解析遥测");
        assert_eq!(data.tem, Some(2160));
        assert_eq!(data.hum, Some(5500));
        assert_eq!(data.online, Some(true));
    }

    #[test]
    fn test_malformed_blob_isolated() {
        // deviceSettings 损坏不影响 lastDeviceData 的解析
        let ext = DeviceExt {
            device_settings: Some("not json{{{".to_string()),
            last_device_data: Some(r#"{"tem":100}"#.to_string()),
            ..Default::default()
        };
        assert!(ext.parsed_device_settings().is_none());
        assert_eq!(ext.parsed_last_device_data().unwrap().tem, Some(100));
    }

    #[test]
    fn test_absent_blob_is_none() {
        let ext = DeviceExt::default();
        assert!(ext.parsed_device_settings().is_none());
        assert!(ext.parsed_last_device_data().is_none());
    }

    #[test]
    fn test_net_waring_typo_preserved() {
        let settings: DeviceSettings =
            serde_json::from_str(r#"{"netWaring":true}"#).unwrap();
        assert_eq!(settings.net_waring, Some(true));
    }

    #[test]
    fn test_lenient_int_coercion() {
        let data: LastDeviceData =
            serde_json::from_str(r#"{"tem":"2160","hum":5500.0}"#).unwrap();
        assert_eq!(data.tem, Some(2160), "数字字符串应被接受");
        assert_eq!(data.hum, Some(5500), "浮点应被接受");
    }

    #[test]
    fn test_lenient_int_junk_does_not_poison_document() {
        // tem 为垃圾值时仅该字段缺失，hum 照常解析
        let data: LastDeviceData =
            serde_json::from_str(r#"{"tem":"abc","hum":4200,"online":false}"#).unwrap();
        assert_eq!(data.tem, None);
        assert_eq!(data.hum, Some(4200));
        assert_eq!(data.online, Some(false));
    }

    #[test]
    fn test_zero_reading_distinct_from_absent() {
        let data: LastDeviceData = serde_json::from_str(r#"{"tem":0}"#).unwrap();
        assert_eq!(data.tem, Some(0), "0 是合法读数");
        assert_eq!(data.hum, None, "缺失字段保持缺失");
    }

    #[test]
    fn test_response_without_data_or_devices() {
        let resp: DeviceListResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.data.devices.is_empty());

        let resp: DeviceListResponse = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert!(resp.data.devices.is_empty());
    }

    #[test]
    fn test_sub_document_roundtrip() {
        // 子文档编码回 JSON 后再解析应得到相同内容
        let data: LastDeviceData =
            serde_json::from_str(r#"{"online":true,"tem":2160,"hum":0,"lastTime":1700000000}"#)
                .unwrap();
        let encoded = serde_json::to_string(&data).unwrap();
        let reparsed: LastDeviceData = serde_json::from_str(&encoded).unwrap();
        assert_eq!(data, reparsed);
    }
}
