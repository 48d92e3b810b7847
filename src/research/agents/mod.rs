//! 研究引擎的提示词智能体

pub mod learning_synthesizer;
pub mod query_planner;
pub mod source_evaluator;
