//! 报告生成与落盘 - 将研究结果组装为本地化文档树并写入磁盘

use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::i18n::TargetLanguage;
use crate::research::context::ResearchContext;
use crate::research::types::ResearchOutcome;

/// 文档键：最终调研报告
pub const DOC_REPORT: &str = "report";
/// 文档键：研究发现清单
pub const DOC_LEARNINGS: &str = "learnings";
/// 文档键：信息来源列表
pub const DOC_SOURCES: &str = "sources";

const COMPOSER_SYSTEM_PROMPT: &str = r#"你是一个专业的调研报告撰写专家，擅长把零散的研究发现整合为结构完整、论证严谨的深度报告。

## 撰写要求：
1. **忠于材料**：报告内容必须完全基于提供的研究发现，不得编造材料之外的事实
2. **置信度意识**：研究发现按置信度降序排列，高置信度的发现应作为报告的主干结论，低置信度的发现应明确标注其不确定性
3. **结构完整**：报告应包含明确的结论、分主题的论述和必要的背景说明
4. **表达专业**：使用准确的术语，避免口语化表达和空洞的套话

## 报告结构建议：
- 以一段执行摘要开头，给出最核心的结论
- 按主题组织正文章节，每个章节围绕若干相关的研究发现展开
- 对相互矛盾或置信度偏低的发现，单独说明分歧和不确定性
- 以待进一步研究的问题收尾"#;

/// 组装最终调研报告。
/// 报告组装不计入Token预算，预算只约束研究树的展开
pub async fn compose(context: &ResearchContext, outcome: &ResearchOutcome) -> Result<String> {
    println!("\n🤖 正在组装调研报告...");

    let user_prompt = build_composer_prompt(context, outcome);
    let (report, _usage) = context
        .model
        .compose_report(COMPOSER_SYSTEM_PROMPT, &user_prompt)
        .await?;

    println!("✅ 调研报告组装完成");
    Ok(report)
}

fn build_composer_prompt(context: &ResearchContext, outcome: &ResearchOutcome) -> String {
    // 加权发现按置信度降序呈现，高可信内容优先被模型采信
    let mut learnings = outcome.findings.weighted_learnings.clone();
    learnings.sort_by(|a, b| {
        b.reliability
            .partial_cmp(&a.reliability)
            .unwrap_or(Ordering::Equal)
    });

    let mut prompt = String::new();
    prompt.push_str("基于以下研究发现，撰写一份完整、深入的调研报告：\n\n");
    prompt.push_str(&format!(
        "## 当前时间信息\n生成时间: {} (UTC)\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    prompt.push_str(&format!("## 调研问题\n{}\n\n", context.config.query));

    prompt.push_str("## 研究发现（按置信度降序）\n");
    if learnings.is_empty() {
        prompt.push_str("（本次研究未能产出任何研究发现，请在报告中如实说明）\n");
    } else {
        for learning in &learnings {
            prompt.push_str(&format!(
                "- [置信度 {:.2}] {}\n",
                learning.reliability, learning.content
            ));
        }
    }
    prompt.push('\n');

    prompt.push_str(&format!(
        "## 材料规模\n- 研究发现 {} 条\n- 信息来源 {} 个\n\n",
        outcome.findings.learnings.len(),
        outcome.findings.visited_urls.len()
    ));

    prompt.push_str(&format!(
        "## 语言要求\n{}\n",
        context.config.target_language.prompt_instruction()
    ));

    prompt
}

/// 渲染原始研究发现清单，报告之外的原始材料留档
pub fn render_learnings(config: &Config, outcome: &ResearchOutcome) -> String {
    let mut content = String::new();

    content.push_str("# 研究发现\n\n");
    content.push_str(&format!(
        "生成时间: {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    content.push_str(&format!("调研问题: {}\n\n", config.query));

    if outcome.findings.weighted_learnings.is_empty() {
        content.push_str("本次研究未能产出任何研究发现。\n");
        return content;
    }

    content.push_str(&format!(
        "共 {} 条，按研究树合并顺序排列：\n\n",
        outcome.findings.weighted_learnings.len()
    ));
    for learning in &outcome.findings.weighted_learnings {
        content.push_str(&format!(
            "- **[置信度 {:.2}]** {}\n",
            learning.reliability, learning.content
        ));
    }

    content
}

/// 渲染去重后的信息来源列表
pub fn render_sources(config: &Config, outcome: &ResearchOutcome) -> String {
    let mut content = String::new();

    content.push_str("# 信息来源\n\n");
    content.push_str(&format!(
        "生成时间: {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    content.push_str(&format!("调研问题: {}\n\n", config.query));

    if outcome.findings.source_metadata.is_empty() {
        content.push_str("本次研究未访问任何可用来源。\n");
        return content;
    }

    content.push_str(&format!(
        "共 {} 个来源（同一URL只保留一条）：\n\n",
        outcome.findings.source_metadata.len()
    ));
    for metadata in &outcome.findings.source_metadata {
        let title = metadata.title.as_deref().unwrap_or(&metadata.url);
        content.push_str(&format!("## {}\n\n", title));
        content.push_str(&format!("- 链接: {}\n", metadata.url));
        content.push_str(&format!("- 域名: {}\n", metadata.domain));
        content.push_str(&format!("- 可信度: {:.2}\n", metadata.reliability_score));
        content.push_str(&format!("- 评分依据: {}\n\n", metadata.reliability_reasoning));
    }

    content
}

/// 文档树，key为文档键，value为文档输出的相对路径
pub struct DocTree {
    structure: HashMap<String, String>,
}

impl DocTree {
    pub fn new(target_language: &TargetLanguage) -> Self {
        let structure = HashMap::from([
            (
                DOC_REPORT.to_string(),
                target_language.get_doc_filename(DOC_REPORT),
            ),
            (
                DOC_LEARNINGS.to_string(),
                target_language.get_doc_filename(DOC_LEARNINGS),
            ),
            (
                DOC_SOURCES.to_string(),
                target_language.get_doc_filename(DOC_SOURCES),
            ),
        ]);
        Self { structure }
    }

    pub fn insert(&mut self, doc_key: &str, relative_path: &str) {
        self.structure
            .insert(doc_key.to_string(), relative_path.to_string());
    }
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new(&TargetLanguage::default())
    }
}

pub trait Outlet {
    async fn save(&self, documents: &HashMap<String, String>) -> Result<()>;
}

pub struct DiskOutlet {
    doc_tree: DocTree,
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(doc_tree: DocTree, output_dir: PathBuf) -> Self {
        Self {
            doc_tree,
            output_dir,
        }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, documents: &HashMap<String, String>) -> Result<()> {
        println!("\n🖊️ 文档存储中...");
        // 输出目录整体重建，避免混入上一次运行的残留文件
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;

        // 遍历文档集，按文档树的注册路径保存
        for (doc_key, markdown) in documents {
            if let Some(relative_path) = self.doc_tree.structure.get(doc_key) {
                let output_file_path = self.output_dir.join(relative_path);

                if let Some(parent_dir) = output_file_path.parent() {
                    if !parent_dir.exists() {
                        fs::create_dir_all(parent_dir)?;
                    }
                }

                fs::write(&output_file_path, markdown)?;

                println!("💾 已保存文档: {}", output_file_path.display());
            } else {
                // 未注册的文档只告警，不中断其余文档的保存
                eprintln!("⚠️ 警告: 文档未在文档树中注册，已跳过，键: {}", doc_key);
            }
        }

        println!("💾 文档保存完成，输出目录: {}", self.output_dir.display());

        Ok(())
    }
}

/// 保存文档集
pub async fn save(context: &ResearchContext, documents: HashMap<String, String>) -> Result<()> {
    let doc_tree = DocTree::new(&context.config.target_language);
    let outlet = DiskOutlet::new(doc_tree, context.config.output_path.clone());
    outlet.save(&documents).await
}

// Include tests
#[cfg(test)]
mod tests;
