use serde::{Deserialize, Serialize};

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    #[default]
    Chinese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ru")]
    Russian,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Japanese => write!(f, "ja"),
            TargetLanguage::Korean => write!(f, "ko"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::French => write!(f, "fr"),
            TargetLanguage::Russian => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "ja" | "japanese" | "日本語" | "日文" => Ok(TargetLanguage::Japanese),
            "ko" | "korean" | "한국어" | "韩文" => Ok(TargetLanguage::Korean),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            "ru" | "russian" | "русский" | "俄文" => Ok(TargetLanguage::Russian),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "English",
            TargetLanguage::Japanese => "日本語",
            TargetLanguage::Korean => "한국어",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::French => "Français",
            TargetLanguage::Russian => "Русский",
        }
    }

    /// 获取语言的提示词指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "请使用中文撰写调研报告，确保语言表达准确、专业、易于理解。",
            TargetLanguage::English => {
                "Please write the research report in English, ensuring accurate, professional, and easy-to-understand language."
            }
            TargetLanguage::Japanese => {
                "日本語で調査レポートを作成してください。正確で専門的で理解しやすい言語表現を心がけてください。"
            }
            TargetLanguage::Korean => {
                "한국어로 조사 보고서를 작성해 주세요. 정확하고 전문적이며 이해하기 쉬운 언어 표현을 사용해 주세요."
            }
            TargetLanguage::German => {
                "Bitte verfassen Sie den Forschungsbericht auf Deutsch und stellen Sie sicher, dass die Sprache präzise, professionell und leicht verständlich ist."
            }
            TargetLanguage::French => {
                "Veuillez rédiger le rapport de recherche en français, en vous assurant que le langage soit précis, professionnel et facile à comprendre."
            }
            TargetLanguage::Russian => {
                "Пожалуйста, напишите исследовательский отчёт на русском языке, обеспечив точность, профессионализм и понятность изложения."
            }
        }
    }

    /// 获取文档文件名
    pub fn get_doc_filename(&self, doc_type: &str) -> String {
        match self {
            TargetLanguage::Chinese => match doc_type {
                "report" => "1、调研报告.md".to_string(),
                "learnings" => "2、研究发现.md".to_string(),
                "sources" => "3、信息来源.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::English => match doc_type {
                "report" => "1.Research-Report.md".to_string(),
                "learnings" => "2.Learnings.md".to_string(),
                "sources" => "3.Sources.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::Japanese => match doc_type {
                "report" => "1-調査レポート.md".to_string(),
                "learnings" => "2-調査結果.md".to_string(),
                "sources" => "3-情報源.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::Korean => match doc_type {
                "report" => "1-조사-보고서.md".to_string(),
                "learnings" => "2-조사-결과.md".to_string(),
                "sources" => "3-정보-출처.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::German => match doc_type {
                "report" => "1-Forschungsbericht.md".to_string(),
                "learnings" => "2-Erkenntnisse.md".to_string(),
                "sources" => "3-Quellen.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::French => match doc_type {
                "report" => "1-Rapport-de-Recherche.md".to_string(),
                "learnings" => "2-Découvertes.md".to_string(),
                "sources" => "3-Sources.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
            TargetLanguage::Russian => match doc_type {
                "report" => "1-Исследовательский-Отчёт.md".to_string(),
                "learnings" => "2-Выводы.md".to_string(),
                "sources" => "3-Источники.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
        }
    }
}
