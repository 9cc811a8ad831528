//! 持久化行模型

use domain::{Reading, RegisterValue};
use serde::Serialize;
use serde_json::{Map, Value};

/// `plc_reading` 表的一行。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRow {
    pub plc_id: i64,
    pub plc_name: String,
    pub read_at_ms: i64,
    pub payload: Value,
}

impl ReadingRow {
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            plc_id: i64::from(reading.plc_id()),
            plc_name: reading.plc_name().to_string(),
            read_at_ms: reading.timestamp_ms(),
            payload: payload_json(reading),
        }
    }
}

/// 字段名 → 数值或字符串。
pub fn payload_json(reading: &Reading) -> Value {
    let object: Map<String, Value> = reading
        .values()
        .iter()
        .map(|(field, value)| (field.clone(), value_json(value)))
        .collect();
    Value::Object(object)
}

fn value_json(value: &RegisterValue) -> Value {
    match value {
        // NaN / 无穷大无法表示为 JSON 数字
        RegisterValue::Float(v) => serde_json::Number::from_f64(f64::from(*v))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        RegisterValue::UInt16(v) => Value::from(*v),
        RegisterValue::Text(v) => Value::String(v.clone()),
    }
}
