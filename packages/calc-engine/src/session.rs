use crate::config::CalcConfig;
use crate::error::CalcError;
use crate::interaction::CalculatorInteraction;
use crate::operation::{Arity, Operation};
use crate::registry::Registry;
use anyhow::Result;
use tracing::{debug, info, warn};

/// What the user picked at the operation prompt.
#[derive(Debug, Clone, Copy)]
pub enum Selection {
    Quit,
    Operation(&'static Operation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// Counters for one run of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub evaluations: usize,
    pub domain_errors: usize,
    pub input_errors: usize,
    pub unknown_selectors: usize,
}

pub struct Session {
    registry: Registry,
    config: CalcConfig,
}

impl Session {
    pub fn new(registry: Registry, config: CalcConfig) -> Self {
        Self { registry, config }
    }

    /// Maps raw selector input to a quit request or a registered operation.
    /// Anything other than a single known character is rejected.
    pub fn resolve(&self, input: &str) -> Result<Selection, CalcError> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        let selector = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(CalcError::UnknownSelector(trimmed.to_string())),
        };

        if Registry::is_quit(selector) {
            return Ok(Selection::Quit);
        }
        self.registry
            .lookup(selector)
            .map(Selection::Operation)
            .ok_or_else(|| CalcError::UnknownSelector(trimmed.to_string()))
    }

    /// Parses exactly `arity.operand_count()` whitespace-separated finite numbers.
    pub fn parse_operands(line: &str, arity: Arity) -> Result<Vec<f64>, CalcError> {
        let operands = line
            .split_whitespace()
            .map(|token| match token.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(CalcError::InvalidNumber(token.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expected = arity.operand_count();
        if operands.len() != expected {
            return Err(CalcError::OperandCount {
                expected,
                found: operands.len(),
            });
        }
        Ok(operands)
    }

    pub fn evaluate(&self, op: &Operation, line: &str) -> Result<f64, CalcError> {
        let operands = Self::parse_operands(line, op.arity())?;
        debug!(selector = %op.selector, ?operands, "Dispatching {}", op.name);
        op.apply_slice(&operands)
    }

    /// Runs until the user quits or input runs out.
    pub async fn run<I>(&self, ui: &mut I) -> Result<SessionSummary>
    where
        I: CalculatorInteraction + Send + ?Sized,
    {
        info!("Session started with {} operations", self.registry.len());
        let mut summary = SessionSummary::default();
        while self.step(ui, &mut summary).await? == Step::Continue {}
        info!(
            evaluations = summary.evaluations,
            domain_errors = summary.domain_errors,
            input_errors = summary.input_errors,
            unknown_selectors = summary.unknown_selectors,
            "Session ended"
        );
        Ok(summary)
    }

    /// One menu → selector → operands → result round.
    pub async fn step<I>(&self, ui: &mut I, summary: &mut SessionSummary) -> Result<Step>
    where
        I: CalculatorInteraction + Send + ?Sized,
    {
        if self.config.clear_screen {
            ui.clear_screen()?;
        }
        ui.show_menu(&self.config.title, &self.registry)?;

        let Some(input) = ui.read_line("Enter operation").await? else {
            info!("Input closed at operation prompt");
            ui.farewell()?;
            return Ok(Step::Quit);
        };
        if input.trim().is_empty() {
            return Ok(Step::Continue);
        }

        let op = match self.resolve(&input) {
            Ok(Selection::Quit) => {
                ui.farewell()?;
                return Ok(Step::Quit);
            }
            Ok(Selection::Operation(op)) => op,
            Err(err) => {
                warn!("{}", err);
                summary.unknown_selectors += 1;
                ui.show_error(&err)?;
                self.pause(ui).await?;
                return Ok(Step::Continue);
            }
        };

        if self.config.clear_screen {
            ui.clear_screen()?;
        }
        let prompt = match op.arity() {
            Arity::Unary => "Enter a number",
            Arity::Binary => "Enter two numbers",
        };
        let Some(line) = ui.read_line(prompt).await? else {
            info!("Input closed at operand prompt");
            ui.farewell()?;
            return Ok(Step::Quit);
        };

        if self.config.clear_screen {
            ui.clear_screen()?;
        }
        match self.evaluate(op, &line) {
            Ok(value) => {
                summary.evaluations += 1;
                ui.show_result(&self.config.format_value(value))?;
            }
            Err(err) => {
                warn!(selector = %op.selector, "{} failed: {}", op.name, err);
                if err.is_domain() {
                    summary.domain_errors += 1;
                } else {
                    summary.input_errors += 1;
                }
                ui.show_error(&err)?;
            }
        }
        self.pause(ui).await?;
        Ok(Step::Continue)
    }

    async fn pause<I>(&self, ui: &mut I) -> Result<()>
    where
        I: CalculatorInteraction + Send + ?Sized,
    {
        if self.config.pause_after_result {
            ui.pause().await?;
        }
        Ok(())
    }
}
