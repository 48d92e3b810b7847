//! 调研工作流 - 串联配置校验、连通性检查、研究执行与报告落盘

use anyhow::Result;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::report;
use crate::research;
use crate::research::context::ResearchContext;
use crate::research::types::ResearchOutcome;

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: std::time::Instant,
    phase_start_times: HashMap<String, std::time::Instant>,
    phase_durations: HashMap<String, Duration>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: HashMap::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), std::time::Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        if let Some(start_time) = self.phase_start_times.remove(phase_name) {
            let duration = start_time.elapsed();
            self.phase_durations
                .insert(phase_name.to_string(), duration);
            Some(duration)
        } else {
            None
        }
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("各阶段执行时间:\n");
            for phase in TimingKeys::ordered() {
                if let Some(duration) = self.phase_durations.get(phase) {
                    report.push_str(&format!("- {}: {:.2}秒\n", phase, duration.as_secs_f64()));
                }
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const RESEARCH: &'static str = "research";
    pub const COMPOSE: &'static str = "compose";
    pub const OUTPUT: &'static str = "output";

    /// 按工作流顺序列出所有阶段
    pub fn ordered() -> Vec<&'static str> {
        vec![Self::RESEARCH, Self::COMPOSE, Self::OUTPUT]
    }
}

/// 启动调研工作流
pub async fn launch(config: &Config) -> Result<()> {
    config.validate()?;

    let context = ResearchContext::new(config.clone())?;
    run(&context).await
}

/// 在已构建的协作者上执行完整工作流
pub async fn run(context: &ResearchContext) -> Result<()> {
    // 启动时检查模型连接
    context.model.check_connection().await?;

    let config = &context.config;
    let mut timing = TimingScope::new();

    timing.start_phase(TimingKeys::RESEARCH);
    let outcome = research::execute(&context).await?;
    timing.end_phase(TimingKeys::RESEARCH);

    // 组装文档集。跳过报告时只落盘原始研究材料
    let mut documents = HashMap::new();
    if config.skip_report {
        println!("\n⏭️ 已跳过报告组装，仅输出原始研究材料");
    } else {
        timing.start_phase(TimingKeys::COMPOSE);
        let report_markdown = report::compose(&context, &outcome).await?;
        timing.end_phase(TimingKeys::COMPOSE);
        documents.insert(report::DOC_REPORT.to_string(), report_markdown);
    }
    documents.insert(
        report::DOC_LEARNINGS.to_string(),
        report::render_learnings(&context.config, &outcome),
    );
    documents.insert(
        report::DOC_SOURCES.to_string(),
        report::render_sources(&context.config, &outcome),
    );

    timing.start_phase(TimingKeys::OUTPUT);
    report::save(&context, documents).await?;
    timing.end_phase(TimingKeys::OUTPUT);

    print_summary(&context, &outcome, &timing);

    Ok(())
}

fn print_summary(context: &ResearchContext, outcome: &ResearchOutcome, timing: &TimingScope) {
    println!("\n📊 调研总结");
    println!("- 调研问题: {}", context.config.query);
    println!("- 研究发现: {} 条", outcome.findings.learnings.len());
    println!("- 信息来源: {} 个", outcome.findings.source_metadata.len());
    println!("- 访问URL: {} 个", outcome.findings.visited_urls.len());
    match outcome.budget.budget_tokens {
        Some(cap) => println!(
            "- Token用量: {} / {}（估算）",
            outcome.budget.used_tokens, cap
        ),
        None => println!("- Token用量: {}（估算，未设预算）", outcome.budget.used_tokens),
    }
    print!("{}", timing.generate_timing_report());
}
