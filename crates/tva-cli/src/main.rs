//! Tactical Voting Analysis CLI - find voters who gain by lying on their ballot

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tva_core::{AnalysisConfig, Atva, Btva, Profile};
use tva_schemes::{
    AntiPlurality, Borda, BubbleSortDistance, CollusionChange, FlipReward, HappinessMeasure,
    JointFlipReward, Ndcg, Plurality, PositionMatch, RiskMeasure, StrategicVotingProbability,
    VoteForTwo, VotingRule, WeightedDisplacement, WinnerChange,
};

#[derive(Parser)]
#[command(name = "tva")]
#[command(about = "Tactical Voting Analysis - find voters who gain by voting insincerely")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Validate a preference profile
    Check {
        /// Profile document (JSON)
        profile: PathBuf,
    },
    /// Search a profile for tactical voting opportunities
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Profile document (JSON)
    profile: PathBuf,

    /// Voting rule
    #[arg(short, long, value_enum, default_value_t = RuleKind::Borda)]
    rule: RuleKind,

    /// Happiness measure
    #[arg(long, value_enum, default_value_t = HappinessKind::Ndcg)]
    happiness: HappinessKind,

    /// Risk measure of the basic analysis
    #[arg(long, value_enum, default_value_t = RiskKind::FlipReward)]
    risk: RiskKind,

    /// Run the pairwise collusion analysis instead
    #[arg(long)]
    collusion: bool,

    /// Risk measure of the collusion analysis (defaults to --risk)
    #[arg(long, value_enum)]
    collusion_risk: Option<RiskKind>,

    /// Seed for the colluder pair
    #[arg(long)]
    seed: Option<u64>,

    /// Sensitivity of the flip reward measures
    #[arg(long, default_value_t = FlipReward::MIN_SENSITIVITY)]
    sensitivity: f64,

    /// Analysis configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RuleKind {
    Plurality,
    VoteForTwo,
    AntiPlurality,
    Borda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HappinessKind {
    Ndcg,
    PositionMatch,
    BubbleSort,
    Displacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RiskKind {
    FlipReward,
    JointFlipReward,
    WinnerChange,
    CollusionChange,
    StrategicProbability,
}

type BoxedRisk = Box<dyn RiskMeasure<Value = f64>>;

fn voting_rule(kind: RuleKind) -> Box<dyn VotingRule> {
    match kind {
        RuleKind::Plurality => Box::new(Plurality),
        RuleKind::VoteForTwo => Box::new(VoteForTwo),
        RuleKind::AntiPlurality => Box::new(AntiPlurality),
        RuleKind::Borda => Box::new(Borda),
    }
}

fn happiness_measure(kind: HappinessKind) -> Box<dyn HappinessMeasure> {
    match kind {
        HappinessKind::Ndcg => Box::new(Ndcg::new()),
        HappinessKind::PositionMatch => Box::new(PositionMatch::new()),
        HappinessKind::BubbleSort => Box::new(BubbleSortDistance::new()),
        HappinessKind::Displacement => Box::new(WeightedDisplacement::top_choice()),
    }
}

fn risk_measure(kind: RiskKind, sensitivity: f64) -> anyhow::Result<BoxedRisk> {
    let risk: BoxedRisk = match kind {
        RiskKind::FlipReward => Box::new(FlipReward::new(sensitivity)?),
        RiskKind::JointFlipReward => Box::new(JointFlipReward::new(sensitivity)?),
        RiskKind::WinnerChange => Box::new(WinnerChange),
        RiskKind::CollusionChange => Box::new(CollusionChange),
        RiskKind::StrategicProbability => Box::new(StrategicVotingProbability),
    };
    Ok(risk)
}

fn load_profile(path: &Path) -> anyhow::Result<Profile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing profile {}", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: AnalysisConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Analysis record printed by `tva analyze`.
#[derive(Serialize)]
struct Report<'a, T> {
    candidates: &'a [String],
    rule: &'a str,
    happiness_measure: &'a str,
    risk_measure: &'a str,
    #[serde(flatten)]
    analysis: T,
}

fn check(path: &Path) -> anyhow::Result<String> {
    let profile = load_profile(path)?;
    Ok(format!(
        "{}: {} candidates ({}), {} voters",
        path.display(),
        profile.num_candidates(),
        profile.candidates().join(", "),
        profile.num_voters()
    ))
}

fn analyze(args: &AnalyzeArgs) -> anyhow::Result<String> {
    let profile = load_profile(&args.profile)?;
    let mut config = load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.collusion.seed = args.seed;
    }

    let rule = voting_rule(args.rule);
    let happiness = happiness_measure(args.happiness);
    let happiness_name = happiness.name().to_string();
    let risk_kind = if args.collusion {
        args.collusion_risk.unwrap_or(args.risk)
    } else {
        args.risk
    };
    let risk = risk_measure(risk_kind, args.sensitivity)?;
    let risk_name = risk.name().to_string();

    let json = if args.collusion {
        let mut atva = Atva::with_config(happiness, risk, config)?;
        let analysis = atva.analyze(&profile, rule.as_ref())?;
        info!(first = analysis.pair.0, second = analysis.pair.1, "colluders analyzed");
        serde_json::to_string_pretty(&Report {
            candidates: profile.candidates(),
            rule: rule.name(),
            happiness_measure: &happiness_name,
            risk_measure: &risk_name,
            analysis,
        })?
    } else {
        let analysis = Btva::with_config(happiness, risk, config)?.analyze(&profile, rule.as_ref())?;
        serde_json::to_string_pretty(&Report {
            candidates: profile.candidates(),
            rule: rule.name(),
            happiness_measure: &happiness_name,
            risk_measure: &risk_name,
            analysis,
        })?
    };
    Ok(json)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Check { profile }) => {
            println!("{}", check(&profile)?);
        }
        Some(Commands::Analyze(args)) => {
            println!("{}", analyze(&args)?);
        }
        None => {
            println!("tva v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROFILE: &str = r#"{
        "preferences": [
            ["B", "A", "C", "C"],
            ["C", "C", "B", "B"],
            ["A", "B", "A", "A"]
        ]
    }"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn parse_analyze(args: &[&str]) -> AnalyzeArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Commands::Analyze(args)) => args,
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_defaults() {
        let args = parse_analyze(&["tva", "analyze", "profile.json"]);
        assert_eq!(args.rule, RuleKind::Borda);
        assert_eq!(args.happiness, HappinessKind::Ndcg);
        assert_eq!(args.risk, RiskKind::FlipReward);
        assert!(!args.collusion);
        assert_eq!(args.sensitivity, 1.3);
    }

    #[test]
    fn test_analyze_flags() {
        let args = parse_analyze(&[
            "tva",
            "analyze",
            "profile.json",
            "--rule",
            "vote-for-two",
            "--happiness",
            "bubble-sort",
            "--collusion",
            "--collusion-risk",
            "collusion-change",
            "--seed",
            "7",
        ]);
        assert_eq!(args.rule, RuleKind::VoteForTwo);
        assert_eq!(args.happiness, HappinessKind::BubbleSort);
        assert_eq!(args.collusion_risk, Some(RiskKind::CollusionChange));
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn test_unknown_rule_rejected() {
        assert!(Cli::try_parse_from(["tva", "analyze", "p.json", "--rule", "condorcet"]).is_err());
    }

    #[test]
    fn test_check_reports_shape() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "profile.json", PROFILE);
        let summary = check(&path).unwrap();
        assert!(summary.ends_with("3 candidates (A, B, C), 4 voters"));
    }

    #[test]
    fn test_check_rejects_invalid_profile() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", r#"{ "preferences": [["A", "A"], ["A", "B"]] }"#);
        let err = check(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing profile"));
    }

    #[test]
    fn test_basic_report() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "profile.json", PROFILE);
        let args = parse_analyze(&[
            "tva",
            "analyze",
            path.to_str().unwrap(),
            "--risk",
            "strategic-probability",
        ]);

        let json: serde_json::Value = serde_json::from_str(&analyze(&args).unwrap()).unwrap();
        assert_eq!(json["rule"], "Borda");
        assert_eq!(json["risk_measure"], "StrategicVotingProbability");
        assert_eq!(json["happiness_measure"], "NDCG");
        assert!(json["risk"].is_f64());
        assert_eq!(json["candidates"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(json["manipulation_options"].as_array().unwrap().len(), 4);
        assert_eq!(json["individual_happiness"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_collusion_report_is_seeded() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "profile.json", PROFILE);
        let args = parse_analyze(&[
            "tva",
            "analyze",
            path.to_str().unwrap(),
            "--collusion",
            "--collusion-risk",
            "winner-change",
            "--seed",
            "3",
        ]);

        let first = analyze(&args).unwrap();
        let second = analyze(&args).unwrap();
        assert_eq!(first, second);

        let json: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(json["risk_measure"], "WinnerChange");
        assert!(json["risk"].is_f64());
        assert_eq!(json["collusion_options"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_config_file_is_applied() {
        let dir = TempDir::new().unwrap();
        let profile = write(&dir, "profile.json", PROFILE);
        let config = write(
            &dir,
            "config.json",
            r#"{ "happiness": { "reducer": "sum" } }"#,
        );
        let args = parse_analyze(&[
            "tva",
            "analyze",
            profile.to_str().unwrap(),
            "--happiness",
            "displacement",
            "--config",
            config.to_str().unwrap(),
        ]);

        let json: serde_json::Value = serde_json::from_str(&analyze(&args).unwrap()).unwrap();
        // C wins Borda; voters 2 and 3 rank C first
        assert_eq!(json["overall_happiness"], 2.0);
    }

    #[test]
    fn test_invalid_sensitivity_rejected() {
        assert!(risk_measure(RiskKind::FlipReward, 2.0).is_err());
        assert!(risk_measure(RiskKind::WinnerChange, 2.0).is_ok());
    }
}
