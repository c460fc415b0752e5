//! Certificate verification driver.
//!
//! The driver consumes a certificate as a stream of [`Record`]s and keeps a
//! single "current" descriptor: it starts at the initial tape, is replaced
//! by the after-image of each checked transition, and must close back onto
//! the initial tape at the end of the last run. Nothing past the record
//! being checked is pulled from the stream, so a rejection stops decoding.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::closure::{check_closure, check_initial_tape};
use super::errors::{CheckError, RejectReason, Rejection};
use super::repeater::check_repeater_transition;
use super::segment::check_follow_on;
use super::wall::check_wall_transition;
use super::Budgets;
use crate::certificate::{
    certificate_digest, BouncerType, Certificate, CertificateHeader, Record, RecordReader,
    TransitionKind, TransitionRecord,
};
use crate::config::{BellPolicy, VerifierConfig};
use crate::machine::{Direction, TransitionTable};
use crate::ser::{SerKind, SerResult};
use crate::tape::{Segment, TapeContext, TapeDescriptor};

/// Why a certificate was set aside without a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// `Bell` certificates are counted, not checked.
    Bell,
}

/// Figures reported for a verified certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifySummary {
    pub machine_id: u32,
    pub bouncer_type: BouncerType,
    pub partitions: u32,
    pub runs: u32,
    /// Transitions checked over all runs.
    pub transitions: u64,
    /// Machine steps simulated, startup included.
    pub simulated_steps: u64,
    /// Cells moved by expansion operators.
    pub expanded_cells: u64,
    /// Longest repeater of the initial tape.
    pub max_repeater_period: usize,
    /// BLAKE3 digest of the certificate bytes, when verified from bytes.
    pub digest: Option<[u8; 32]>,
}

/// Verdict on one certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Verified(VerifySummary),
    Rejected(Rejection),
    Skipped(SkipReason),
}

impl Outcome {
    /// Returns `true` for a verified certificate.
    pub fn is_verified(&self) -> bool {
        matches!(self, Outcome::Verified(_))
    }

    /// The rejection, if the certificate was rejected.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Checks bouncer certificates for one machine.
#[derive(Debug)]
pub struct Verifier<'m, M: TransitionTable + ?Sized> {
    machine: &'m M,
    config: VerifierConfig,
}

impl<'m, M: TransitionTable + ?Sized> Verifier<'m, M> {
    /// Creates a verifier for `machine`.
    pub fn new(machine: &'m M, config: VerifierConfig) -> Self {
        Self { machine, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verifies an in-memory certificate.
    pub fn verify(&self, certificate: &Certificate) -> Outcome {
        self.verify_records(certificate.records().map(Ok))
    }

    /// Decodes and verifies a certificate from its canonical bytes.
    pub fn verify_bytes(&self, bytes: &[u8]) -> Outcome {
        let mut outcome = self.verify_records(RecordReader::new(bytes));
        if let Outcome::Verified(summary) = &mut outcome {
            summary.digest = Some(certificate_digest(bytes));
        }
        outcome
    }

    /// Verifies a certificate supplied as a record stream.
    #[instrument(skip_all)]
    pub fn verify_records<I>(&self, records: I) -> Outcome
    where
        I: IntoIterator<Item = SerResult<Record>>,
    {
        let mut session = Session::new(self.machine, &self.config);
        match session.drive(&mut records.into_iter()) {
            Ok(Some(summary)) => Outcome::Verified(summary),
            Ok(None) => Outcome::Skipped(SkipReason::Bell),
            Err(err) => {
                let rejection = Rejection {
                    reason: err.reason,
                    run: session.run,
                    transition: session.transition,
                    detail: err.detail,
                };
                warn!(
                    reason = %rejection.reason,
                    run = ?rejection.run,
                    transition = ?rejection.transition,
                    detail = %rejection.detail,
                    "certificate rejected"
                );
                Outcome::Rejected(rejection)
            }
        }
    }
}

fn malformed(detail: impl Into<String>) -> CheckError {
    CheckError::new(RejectReason::Malformed(SerKind::Certificate), detail)
}

fn pull<I>(records: &mut I, expected: &str) -> Result<Record, CheckError>
where
    I: Iterator<Item = SerResult<Record>>,
{
    match records.next() {
        Some(record) => Ok(record?),
        None => Err(malformed(format!("stream ended before the {expected}"))),
    }
}

/// Per-certificate state: the position reached for error reporting and the
/// resource budgets.
struct Session<'v, M: TransitionTable + ?Sized> {
    machine: &'v M,
    config: &'v VerifierConfig,
    context: TapeContext,
    budgets: Budgets,
    run: Option<u32>,
    transition: Option<u32>,
}

impl<'v, M: TransitionTable + ?Sized> Session<'v, M> {
    fn new(machine: &'v M, config: &'v VerifierConfig) -> Self {
        Self {
            machine,
            config,
            context: TapeContext::of(machine),
            budgets: Budgets::from_limits(&config.limits),
            run: None,
            transition: None,
        }
    }

    fn check_header(&self, header: &CertificateHeader) -> Result<(), CheckError> {
        let limits = &self.config.limits;
        if header.partitions == 0 || header.partitions > limits.max_partitions {
            return Err(CheckError::invariant(format!(
                "{} partitions is outside 1..={}",
                header.partitions, limits.max_partitions
            )));
        }
        if header.runs == 0 || header.runs > limits.max_runs {
            return Err(CheckError::invariant(format!(
                "{} runs is outside 1..={}",
                header.runs, limits.max_runs
            )));
        }
        Ok(())
    }

    fn check_initial(
        &mut self,
        header: &CertificateHeader,
        initial: &TapeDescriptor,
    ) -> Result<(), CheckError> {
        initial.validate(&self.context)?;
        if initial.partitions() != header.partitions as usize {
            return Err(CheckError::invariant(format!(
                "initial tape has {} partitions but the header declares {}",
                initial.partitions(),
                header.partitions
            )));
        }
        check_initial_tape(
            self.machine,
            initial,
            header.initial_steps,
            &mut self.budgets.steps,
        )
    }

    fn check_record(
        &mut self,
        current: &TapeDescriptor,
        record: &TransitionRecord,
        last: bool,
    ) -> Result<TapeDescriptor, CheckError> {
        let after = record.after_image.as_ref();
        if let Some(after) = after {
            after.validate(&self.context)?;
        } else if last || record.kind == TransitionKind::Wall {
            return Err(CheckError::invariant(
                "after-image is required on wall transitions and at the end of a run",
            ));
        }
        let index = record.index as usize;
        let tr = &record.transition;
        match (record.kind, after) {
            (TransitionKind::Wall, Some(after)) => {
                let budgets = &mut self.budgets;
                check_wall_transition(self.machine, current, after, tr, index, budgets)?;
                Ok(after.clone())
            }
            (TransitionKind::Wall, None) => Err(CheckError::invariant("missing after-image")),
            (TransitionKind::RepeaterLeft, after) => check_repeater_transition(
                self.machine,
                current,
                Direction::Left,
                index,
                tr,
                after,
                &mut self.budgets,
            ),
            (TransitionKind::RepeaterRight, after) => check_repeater_transition(
                self.machine,
                current,
                Direction::Right,
                index,
                tr,
                after,
                &mut self.budgets,
            ),
        }
    }

    /// Returns `Ok(None)` when the certificate is skipped.
    fn drive<I>(&mut self, records: &mut I) -> Result<Option<VerifySummary>, CheckError>
    where
        I: Iterator<Item = SerResult<Record>>,
    {
        let Record::Header(header) = pull(records, "header")? else {
            return Err(malformed("certificate does not start with a header"));
        };
        debug!(
            machine_id = header.machine_id,
            kind = ?header.bouncer_type,
            runs = header.runs,
            "verifying certificate"
        );
        if header.bouncer_type == BouncerType::Bell {
            return match self.config.bell_policy {
                BellPolicy::Skip => Ok(None),
                BellPolicy::Reject => {
                    Err(CheckError::invariant("bell certificates are not accepted"))
                }
            };
        }
        self.check_header(&header)?;

        let Record::InitialTape(initial) = pull(records, "initial tape")? else {
            return Err(malformed("header is not followed by the initial tape"));
        };
        self.check_initial(&header, &initial)?;

        let mut current = initial.clone();
        let mut transitions = 0u64;
        for run in 0..header.runs {
            self.run = Some(run);
            self.transition = None;
            let Record::RunStart { transitions: count, .. } = pull(records, "run start")? else {
                return Err(malformed(format!("run {run} does not open with a run start")));
            };
            if count == 0 {
                return Err(CheckError::invariant("run has no transitions"));
            }
            let mut previous: Option<Segment> = None;
            for index in 0..count {
                self.transition = Some(index);
                let Record::Transition(record) = pull(records, "transition")? else {
                    return Err(malformed(format!("run {run} ends after {index} transitions")));
                };
                if let Some(previous) = &previous {
                    check_follow_on(previous, &record.transition.initial)?;
                }
                current = self.check_record(&current, &record, index + 1 == count)?;
                debug!(run, transition = index, kind = ?record.kind, "transition checked");
                previous = Some(record.transition.terminal);
                transitions += 1;
            }
        }

        self.run = None;
        self.transition = None;
        let Record::Closure(closure) = pull(records, "closure")? else {
            return Err(malformed("runs are not followed by the closure"));
        };
        let translated = header.bouncer_type == BouncerType::Translated;
        if translated != (closure.shift != 0) {
            return Err(CheckError::invariant(format!(
                "{:?} certificate cannot close with shift {}",
                header.bouncer_type, closure.shift
            )));
        }
        check_closure(&initial, &current, closure.shift)?;
        match records.next() {
            None => {}
            Some(Err(err)) => return Err(err.into()),
            Some(Ok(_)) => return Err(malformed("records follow the closure")),
        }

        let summary = VerifySummary {
            machine_id: header.machine_id,
            bouncer_type: header.bouncer_type,
            partitions: header.partitions,
            runs: header.runs,
            transitions,
            simulated_steps: self.budgets.steps.used(),
            expanded_cells: self.budgets.expansion.used(),
            max_repeater_period: initial.repeaters.iter().map(Vec::len).max().unwrap_or(0),
            digest: None,
        };
        debug!(
            machine_id = summary.machine_id,
            steps = summary.simulated_steps,
            expanded = summary.expanded_cells,
            "certificate verified"
        );
        Ok(Some(summary))
    }
}
