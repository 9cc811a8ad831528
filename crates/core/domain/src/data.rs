use std::collections::BTreeMap;
use std::sync::Arc;

/// PLC 内存区。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemorySpace {
    /// 数据寄存器（选择字 0x8DFF）。
    #[default]
    Data,
    /// 参数寄存器（选择字 0x08FF）。
    Parameter,
}

/// 寄存器值类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    /// 32 位浮点（2 个 word）。
    Float32,
    /// 16 位无符号整数（1 个 word）。
    UInt16,
    /// 定长字符串，参数为字符数（每个 word 2 个字符）。
    FixedString(u16),
}

impl RegisterKind {
    /// 读取该类型所需的 word 数。
    pub const fn word_count(self) -> u16 {
        match self {
            RegisterKind::Float32 => 2,
            RegisterKind::UInt16 => 1,
            RegisterKind::FixedString(chars) => chars.div_ceil(2),
        }
    }
}

/// 寄存器描述：字段名 → 地址、长度、类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    pub name: &'static str,
    /// 24 位寄存器地址。
    pub address: u32,
    pub word_count: u16,
    pub kind: RegisterKind,
    pub memory: MemorySpace,
}

impl RegisterDescriptor {
    pub const fn new(name: &'static str, address: u32, kind: RegisterKind) -> Self {
        Self {
            name,
            address,
            word_count: kind.word_count(),
            kind,
            memory: MemorySpace::Data,
        }
    }

    pub const fn in_memory(mut self, memory: MemorySpace) -> Self {
        self.memory = memory;
        self
    }
}

/// 解码后的寄存器值。
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterValue {
    Float(f32),
    UInt16(u16),
    Text(String),
}

impl RegisterValue {
    /// 读取失败时的缺省值。
    pub fn zero(kind: RegisterKind) -> Self {
        match kind {
            RegisterKind::Float32 => RegisterValue::Float(0.0),
            RegisterKind::UInt16 => RegisterValue::UInt16(0),
            RegisterKind::FixedString(_) => RegisterValue::Text(String::new()),
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            RegisterValue::Float(v) => Some(*v),
            RegisterValue::UInt16(v) => Some(f32::from(*v)),
            RegisterValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RegisterValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// 一次完整读周期的结果，构造后不可变。
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    plc_id: u32,
    plc_name: String,
    timestamp_ms: i64,
    values: BTreeMap<String, RegisterValue>,
}

impl Reading {
    pub fn new(
        plc_id: u32,
        plc_name: impl Into<String>,
        timestamp_ms: i64,
        values: BTreeMap<String, RegisterValue>,
    ) -> Self {
        Self {
            plc_id,
            plc_name: plc_name.into(),
            timestamp_ms,
            values,
        }
    }

    pub fn plc_id(&self) -> u32 {
        self.plc_id
    }

    pub fn plc_name(&self) -> &str {
        &self.plc_name
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    pub fn values(&self) -> &BTreeMap<String, RegisterValue> {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&RegisterValue> {
        self.values.get(field)
    }
}

/// 在组件间传递的共享读数。
pub type SharedReading = Arc<Reading>;

/// 获取当前时间戳（毫秒）。
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
