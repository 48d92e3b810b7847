use serde::{Deserialize, Serialize};

/// Token使用统计。rig的extractor不透出服务商侧的用量计数，
/// 因此这里的数值由文本长度估算得出。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// 输入token数
    pub input_tokens: usize,
    /// 输出token数
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// 总token数
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}
