//! 请求帧构造与响应解码（纯函数，无 IO）
//!
//! ## 请求帧（38 字节）
//!
//! ```text
//! 0..28   固定协议头
//! 28..30  内存区选择（0x8D 0xFF 数据区 / 0x08 0xFF 参数区）
//! 30..33  寄存器地址（24 位小端）
//! 33      0x00
//! 34..36  word 数（16 位小端）
//! 36..38  0x00 0x00
//! ```
//!
//! ## 响应帧
//!
//! 前 33 字节为响应头，数据 word 从偏移 33 开始，每个 word 2 字节小端。

use crate::error::ProtocolError;
use domain::{MemorySpace, RegisterDescriptor, RegisterKind, RegisterValue};

/// 请求帧长度。
pub const REQUEST_LEN: usize = 38;

/// 响应头长度（数据起始偏移）。
pub const RESPONSE_HEADER_LEN: usize = 33;

/// 24 位地址上限。
pub const MAX_ADDRESS: u32 = 0x00FF_FFFF;

const REQUEST_HEADER: [u8; 28] = [
    0x01, 0x60, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x08, 0x00, 0x0C, 0x00, 0x69, 0x01, //
    0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00,
];

/// 内存区选择字节。
pub fn memory_selector(memory: MemorySpace) -> [u8; 2] {
    match memory {
        MemorySpace::Data => [0x8D, 0xFF],
        MemorySpace::Parameter => [0x08, 0xFF],
    }
}

/// 构造读请求帧。
pub fn build_request(
    address: u32,
    word_count: u16,
    memory: MemorySpace,
) -> Result<[u8; REQUEST_LEN], ProtocolError> {
    if address > MAX_ADDRESS {
        return Err(ProtocolError::AddressOutOfRange(address));
    }

    let mut frame = [0u8; REQUEST_LEN];
    frame[..28].copy_from_slice(&REQUEST_HEADER);
    frame[28..30].copy_from_slice(&memory_selector(memory));

    let address = address.to_le_bytes();
    frame[30..33].copy_from_slice(&address[..3]);

    frame[34..36].copy_from_slice(&word_count.to_le_bytes());
    Ok(frame)
}

/// 解析响应中的 word。
///
/// 响应不足 33 字节视为协议错误；缓冲区在 word 中途结束时，该 word 及之后的 word 取 0。
pub fn parse_words(response: &[u8], word_count: u16) -> Result<Vec<u16>, ProtocolError> {
    if response.len() < RESPONSE_HEADER_LEN {
        return Err(ProtocolError::IncompleteResponse {
            len: response.len(),
        });
    }

    let payload = &response[RESPONSE_HEADER_LEN..];
    let words = (0..usize::from(word_count))
        .map(|i| match payload.get(i * 2..i * 2 + 2) {
            Some(pair) => u16::from_le_bytes([pair[0], pair[1]]),
            None => 0,
        })
        .collect();
    Ok(words)
}

/// 两个 word 还原为 IEEE-754 单精度：`[w0 低, w0 高, w1 低, w1 高]` 按小端解释。
pub fn decode_float32(low: u16, high: u16) -> f32 {
    let [b0, b1] = low.to_le_bytes();
    let [b2, b3] = high.to_le_bytes();
    f32::from_le_bytes([b0, b1, b2, b3])
}

/// 定长字符串：每个 word 先低字节后高字节，去掉 NUL 后裁剪空白。
pub fn decode_fixed_string(words: &[u16]) -> String {
    let bytes: Vec<u8> = words
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .filter(|byte| *byte != 0)
        .collect();
    // 单字节按 Latin-1 映射为字符
    let text: String = bytes.into_iter().map(char::from).collect();
    text.trim().to_string()
}

pub fn decode_uint16(words: &[u16]) -> Option<u16> {
    words.first().copied()
}

/// 按描述的类型解码；word 不足时返回 `None`，由调用方回退为缺省值。
pub fn decode_value(descriptor: &RegisterDescriptor, words: &[u16]) -> Option<RegisterValue> {
    match descriptor.kind {
        RegisterKind::Float32 => match words {
            [low, high, ..] => Some(RegisterValue::Float(decode_float32(*low, *high))),
            _ => None,
        },
        RegisterKind::UInt16 => decode_uint16(words).map(RegisterValue::UInt16),
        RegisterKind::FixedString(_) => {
            if words.is_empty() {
                None
            } else {
                Some(RegisterValue::Text(decode_fixed_string(words)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_words(words: &[u16]) -> Vec<u8> {
        let mut bytes = vec![0xAAu8; RESPONSE_HEADER_LEN];
        for word in words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn request_layout() {
        let frame = build_request(0x0012_3456, 0x0102, MemorySpace::Data).unwrap();
        assert_eq!(frame.len(), REQUEST_LEN);
        assert_eq!(&frame[..28], &REQUEST_HEADER);
        assert_eq!(&frame[28..30], &[0x8D, 0xFF]);
        assert_eq!(&frame[30..34], &[0x56, 0x34, 0x12, 0x00]);
        assert_eq!(&frame[34..38], &[0x02, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn request_parameter_space() {
        let frame = build_request(800, 2, MemorySpace::Parameter).unwrap();
        assert_eq!(&frame[28..30], &[0x08, 0xFF]);
        assert_eq!(&frame[30..33], &[0x20, 0x03, 0x00]);
    }

    #[test]
    fn request_rejects_wide_address() {
        let err = build_request(0x0100_0000, 1, MemorySpace::Data).unwrap_err();
        assert!(matches!(err, ProtocolError::AddressOutOfRange(0x0100_0000)));
    }

    #[test]
    fn parse_words_reads_payload() {
        let response = response_with_words(&[0x1234, 0xBEEF, 0x0001]);
        let words = parse_words(&response, 3).unwrap();
        assert_eq!(words, vec![0x1234, 0xBEEF, 0x0001]);
    }

    #[test]
    fn parse_words_short_response_is_protocol_fault() {
        let err = parse_words(&[0u8; 32], 2).unwrap_err();
        assert!(matches!(err, ProtocolError::IncompleteResponse { len: 32 }));
        assert!(!err.is_connection_fault());
    }

    #[test]
    fn parse_words_zero_fills_truncated_tail() {
        let mut response = response_with_words(&[0x1111]);
        // 第二个 word 只有 1 字节
        response.push(0x22);
        let words = parse_words(&response, 3).unwrap();
        assert_eq!(words, vec![0x1111, 0, 0]);

        let header_only = vec![0u8; RESPONSE_HEADER_LEN];
        assert_eq!(parse_words(&header_only, 2).unwrap(), vec![0, 0]);
    }

    #[test]
    fn float_one() {
        assert_eq!(decode_float32(0x0000, 0x3F80), 1.0);
        assert_eq!(decode_float32(0x0000, 0xC120), -10.0);
    }

    #[test]
    fn float_from_response() {
        let bits = 123.25f32.to_bits();
        let low = (bits & 0xFFFF) as u16;
        let high = (bits >> 16) as u16;
        let words = parse_words(&response_with_words(&[low, high]), 2).unwrap();
        let descriptor = domain::RegisterDescriptor::new("x", 1, RegisterKind::Float32);
        assert_eq!(
            decode_value(&descriptor, &words),
            Some(RegisterValue::Float(123.25))
        );
    }

    #[test]
    fn fixed_string_low_byte_first() {
        // "OP" "-1" "2\0" 以及尾部空格
        let words = [
            u16::from_le_bytes([b'O', b'P']),
            u16::from_le_bytes([b'-', b'1']),
            u16::from_le_bytes([b'2', 0]),
            u16::from_le_bytes([b' ', b' ']),
        ];
        assert_eq!(decode_fixed_string(&words), "OP-12");
        assert_eq!(decode_fixed_string(&[0, 0]), "");
    }

    #[test]
    fn decode_value_missing_words() {
        let float = domain::RegisterDescriptor::new("f", 1, RegisterKind::Float32);
        assert_eq!(decode_value(&float, &[0x1]), None);
        let word = domain::RegisterDescriptor::new("w", 1, RegisterKind::UInt16);
        assert_eq!(decode_value(&word, &[7]), Some(RegisterValue::UInt16(7)));
        assert_eq!(decode_value(&word, &[]), None);
    }
}
