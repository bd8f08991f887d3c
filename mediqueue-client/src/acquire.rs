//! Turn acquisition flow
//!
//! Finite state machine behind the self-service kiosk: pick an area,
//! confirm, request a turn with automatic office assignment, then show
//! the ticket and auto-reset after a short countdown. Cooldown (HTTP
//! 429) is a throttling notice with its own state, distinct from a
//! failure; any other failure returns the user to the confirm step so
//! they can retry without re-selecting the area.

use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use mediqueue_printer::{
    FilePrinter, NetworkPrinter, PrintResult, Printer, TicketRenderer, TurnReceipt,
};
use shared::Area;
use shared::client::CreatedTurn;
use shared::util::format_wait_seconds;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Seam between the state machine and the HTTP client
#[async_trait]
pub trait TurnApi: Send + Sync {
    /// Areas offered on the kiosk
    async fn basic_areas(&self) -> ClientResult<Vec<Area>>;

    /// Create a turn with automatic office assignment
    async fn create_public_turn(&self, area_id: &str) -> ClientResult<CreatedTurn>;
}

#[async_trait]
impl TurnApi for HttpClient {
    async fn basic_areas(&self) -> ClientResult<Vec<Area>> {
        HttpClient::basic_areas(self).await
    }

    async fn create_public_turn(&self, area_id: &str) -> ClientResult<CreatedTurn> {
        HttpClient::create_public_turn(self, area_id).await
    }
}

/// Destination for the printable ticket
///
/// Emission is best-effort: the kiosk logs a failure and keeps the
/// successfully acquired turn. The turn exists server-side regardless.
#[async_trait]
pub trait ReceiptSink: Send + Sync {
    async fn emit(&self, receipt: &TurnReceipt) -> PrintResult<()>;
}

/// Renders the ticket and sends it to a printer adapter
pub struct PrinterSink<P> {
    renderer: TicketRenderer,
    printer: P,
}

impl<P: Printer> PrinterSink<P> {
    pub fn new(renderer: TicketRenderer, printer: P) -> Self {
        Self { renderer, printer }
    }
}

#[async_trait]
impl ReceiptSink for PrinterSink<NetworkPrinter> {
    async fn emit(&self, receipt: &TurnReceipt) -> PrintResult<()> {
        self.printer.print(&self.renderer.render(receipt)).await
    }
}

#[async_trait]
impl ReceiptSink for PrinterSink<FilePrinter> {
    async fn emit(&self, receipt: &TurnReceipt) -> PrintResult<()> {
        self.printer.print(&self.renderer.render(receipt)).await
    }
}

/// Countdown with a single cancellable handle
///
/// Backs the auto-reset after a successful acquisition. Dropping the
/// countdown (abandoning the flow) cancels the timer; nothing leaks.
#[derive(Debug)]
pub struct ResetCountdown {
    deadline: tokio::time::Instant,
    cancel: CancellationToken,
}

impl ResetCountdown {
    /// Start counting down from `duration`
    pub fn start(duration: Duration) -> Self {
        Self {
            deadline: tokio::time::Instant::now() + duration,
            cancel: CancellationToken::new(),
        }
    }

    /// Time left, zero once expired
    pub fn remaining(&self) -> Duration {
        self.deadline
            .saturating_duration_since(tokio::time::Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Wait for expiry; returns false if the countdown was cancelled first
    pub async fn wait(&self) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep_until(self.deadline) => true,
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ResetCountdown {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The acquired turn as shown on the success screen
#[derive(Debug, Clone)]
pub struct AcquiredTicket {
    pub area: Area,
    /// Server-assigned sequential number
    pub number: i64,
    /// Prefixed label, e.g. "C5"
    pub label: String,
    pub office_number: Option<i32>,
    /// Turn identifier, when the server returns one
    pub id: Option<String>,
    pub issued_at: DateTime<Local>,
}

/// Kiosk flow states
#[derive(Debug)]
pub enum AcquireState {
    /// Showing the area list
    SelectingArea,
    /// One area chosen, waiting for the confirm action
    Confirming { area: Area },
    /// Request in flight; confirm is a no-op here
    Requesting { area: Area },
    /// Turn acquired; resets to SelectingArea when the countdown expires
    Success {
        ticket: AcquiredTicket,
        countdown: ResetCountdown,
    },
    /// Throttled by the server; wait before requesting another turn
    Cooldown { area: Area, message: String },
    /// Request failed; retry is possible without re-selecting the area
    Failed { area: Area, message: String },
}

/// Self-service kiosk state machine
pub struct TurnKiosk<A: TurnApi> {
    api: A,
    sink: Option<Box<dyn ReceiptSink>>,
    areas: Vec<Area>,
    state: AcquireState,
    reset_after: Duration,
}

impl<A: TurnApi> TurnKiosk<A> {
    /// Create the kiosk, loading the area list once
    pub async fn new(api: A) -> ClientResult<Self> {
        let areas = api.basic_areas().await?;
        Ok(Self {
            api,
            sink: None,
            areas,
            state: AcquireState::SelectingArea,
            reset_after: Duration::from_secs(5),
        })
    }

    /// Attach a receipt sink (printer, spool file)
    pub fn with_receipt_sink(mut self, sink: impl ReceiptSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Override the success-screen countdown (default 5 seconds)
    pub fn with_reset_after(mut self, duration: Duration) -> Self {
        self.reset_after = duration;
        self
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn state(&self) -> &AcquireState {
        &self.state
    }

    /// Choose an area; only valid while showing the area list
    pub fn select_area(&mut self, area_id: &str) -> bool {
        if !matches!(self.state, AcquireState::SelectingArea) {
            return false;
        }
        match self.areas.iter().find(|a| a.id == area_id) {
            Some(area) => {
                self.state = AcquireState::Confirming { area: area.clone() };
                true
            }
            None => false,
        }
    }

    /// Return to the area list, clearing any prior error
    ///
    /// From Success this is the manual "new turn" action that skips the
    /// countdown. A no-op while a request is in flight.
    pub fn back(&mut self) {
        if matches!(self.state, AcquireState::Requesting { .. }) {
            return;
        }
        self.state = AcquireState::SelectingArea;
    }

    /// Fire the confirmed request
    ///
    /// Valid from Confirming, and from Failed as the retry action. While
    /// already Requesting this is a no-op: no second call is issued until
    /// the first resolves.
    pub async fn confirm(&mut self) -> &AcquireState {
        let area = match &self.state {
            AcquireState::Confirming { area } | AcquireState::Failed { area, .. } => area.clone(),
            _ => return &self.state,
        };

        self.state = AcquireState::Requesting { area: area.clone() };

        match self.api.create_public_turn(&area.id).await {
            Ok(created) => {
                let ticket = AcquiredTicket {
                    label: area.ticket_label(created.number),
                    number: created.number,
                    office_number: created.office_number(),
                    id: created.id.clone(),
                    issued_at: Local::now(),
                    area,
                };
                info!(
                    turn = %ticket.label,
                    office = ?ticket.office_number,
                    "Turn acquired"
                );
                self.emit_receipt(&ticket).await;
                self.state = AcquireState::Success {
                    ticket,
                    countdown: ResetCountdown::start(self.reset_after),
                };
            }
            Err(ClientError::Cooldown {
                message,
                seconds_remaining,
            }) => {
                let message = match seconds_remaining {
                    Some(secs) => format!(
                        "Debe esperar {} antes de solicitar un nuevo turno",
                        format_wait_seconds(secs)
                    ),
                    None => message,
                };
                self.state = AcquireState::Cooldown { area, message };
            }
            Err(e) => {
                warn!(error = %e, "Turn request failed");
                self.state = AcquireState::Failed {
                    area,
                    message: e.user_message(),
                };
            }
        }

        &self.state
    }

    /// Reset to the area list if the success countdown has expired
    pub fn poll_reset(&mut self) -> bool {
        if let AcquireState::Success { countdown, .. } = &self.state
            && countdown.is_expired()
        {
            self.state = AcquireState::SelectingArea;
            return true;
        }
        false
    }

    /// Await the success countdown, then reset
    ///
    /// Returns immediately outside Success; returns without resetting if
    /// the countdown was cancelled.
    pub async fn wait_reset(&mut self) {
        let expired = match &self.state {
            AcquireState::Success { countdown, .. } => countdown.wait().await,
            _ => return,
        };
        if expired {
            self.state = AcquireState::SelectingArea;
        }
    }

    /// Best-effort receipt emission; never disturbs the acquired turn
    async fn emit_receipt(&self, ticket: &AcquiredTicket) {
        let Some(sink) = &self.sink else { return };

        let receipt = TurnReceipt {
            turn_number: ticket.label.clone(),
            area_name: ticket.area.name.clone(),
            office_number: ticket.office_number,
            turn_id: ticket.id.clone(),
            issued_at: ticket.issued_at,
        };

        if let Err(e) = sink.emit(&receipt).await {
            warn!(error = %e, turn = %ticket.label, "Receipt emission failed");
        }
    }

    #[cfg(test)]
    fn force_state(&mut self, state: AcquireState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::client::{AssignedOffice, AutoAssignment};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cardiologia() -> Area {
        Area {
            id: "a1".into(),
            name: "Cardiología".into(),
            letter_code: "C".into(),
            color: None,
            icon: None,
        }
    }

    fn created(number: i64, office: Option<i32>) -> CreatedTurn {
        CreatedTurn {
            id: Some("t1".into()),
            number,
            assignment: office.map(|n| AutoAssignment {
                office: Some(AssignedOffice { number: n }),
            }),
        }
    }

    struct MockApi {
        areas: Vec<Area>,
        responses: Mutex<VecDeque<ClientResult<CreatedTurn>>>,
        calls: AtomicUsize,
    }

    impl MockApi {
        fn new(responses: Vec<ClientResult<CreatedTurn>>) -> Self {
            Self {
                areas: vec![cardiologia()],
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TurnApi for &MockApi {
        async fn basic_areas(&self) -> ClientResult<Vec<Area>> {
            Ok(self.areas.clone())
        }

        async fn create_public_turn(&self, _area_id: &str) -> ClientResult<CreatedTurn> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Unknown("no scripted response".into())))
        }
    }

    #[derive(Default)]
    struct CaptureSink {
        emitted: Mutex<Vec<TurnReceipt>>,
    }

    #[async_trait]
    impl ReceiptSink for std::sync::Arc<CaptureSink> {
        async fn emit(&self, receipt: &TurnReceipt) -> PrintResult<()> {
            self.emitted.lock().unwrap().push(receipt.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ReceiptSink for FailingSink {
        async fn emit(&self, _receipt: &TurnReceipt) -> PrintResult<()> {
            Err(mediqueue_printer::PrintError::Offline("no printer".into()))
        }
    }

    #[tokio::test]
    async fn test_select_confirm_success_with_receipt() {
        let api = MockApi::new(vec![Ok(created(5, Some(2)))]);
        let sink = std::sync::Arc::new(CaptureSink::default());
        let mut kiosk = TurnKiosk::new(&api)
            .await
            .unwrap()
            .with_receipt_sink(sink.clone());

        assert!(kiosk.select_area("a1"));
        assert!(matches!(kiosk.state(), AcquireState::Confirming { .. }));

        kiosk.confirm().await;
        match kiosk.state() {
            AcquireState::Success { ticket, .. } => {
                assert_eq!(ticket.label, "C5");
                assert_eq!(ticket.office_number, Some(2));
            }
            other => panic!("expected success, got {:?}", other),
        }

        let emitted = sink.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].turn_number, "C5");
        assert_eq!(emitted[0].area_name, "Cardiología");
        assert_eq!(emitted[0].office_number, Some(2));
    }

    #[tokio::test]
    async fn test_select_unknown_area_rejected() {
        let api = MockApi::new(vec![]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();
        assert!(!kiosk.select_area("nope"));
        assert!(matches!(kiosk.state(), AcquireState::SelectingArea));
    }

    #[tokio::test]
    async fn test_cooldown_message_minutes_and_seconds() {
        let api = MockApi::new(vec![Err(ClientError::Cooldown {
            message: "Too many requests".into(),
            seconds_remaining: Some(125),
        })]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();

        kiosk.select_area("a1");
        kiosk.confirm().await;

        match kiosk.state() {
            AcquireState::Cooldown { message, .. } => {
                assert!(message.contains("2 minutos y 5 segundos"), "{}", message);
            }
            other => panic!("expected cooldown, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cooldown_message_seconds_only() {
        let api = MockApi::new(vec![Err(ClientError::Cooldown {
            message: String::new(),
            seconds_remaining: Some(45),
        })]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();

        kiosk.select_area("a1");
        kiosk.confirm().await;

        match kiosk.state() {
            AcquireState::Cooldown { message, .. } => {
                assert!(message.contains("45 segundos"), "{}", message);
                assert!(!message.contains("minuto"), "{}", message);
            }
            other => panic!("expected cooldown, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_allows_retry_without_reselect() {
        let api = MockApi::new(vec![
            Err(ClientError::Server("boom".into())),
            Ok(created(6, None)),
        ]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();

        kiosk.select_area("a1");
        kiosk.confirm().await;
        assert!(matches!(kiosk.state(), AcquireState::Failed { message, .. } if message == "boom"));

        // Retry directly from the failed state
        kiosk.confirm().await;
        assert!(matches!(kiosk.state(), AcquireState::Success { .. }));
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_confirm_is_single_flight() {
        let api = MockApi::new(vec![]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();

        kiosk.force_state(AcquireState::Requesting {
            area: cardiologia(),
        });
        kiosk.confirm().await;

        assert_eq!(api.calls(), 0, "no call may be issued while requesting");
        assert!(matches!(kiosk.state(), AcquireState::Requesting { .. }));
    }

    #[tokio::test]
    async fn test_failing_sink_keeps_success() {
        let api = MockApi::new(vec![Ok(created(9, None))]);
        let mut kiosk = TurnKiosk::new(&api)
            .await
            .unwrap()
            .with_receipt_sink(FailingSink);

        kiosk.select_area("a1");
        kiosk.confirm().await;
        assert!(matches!(kiosk.state(), AcquireState::Success { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_auto_resets_after_countdown() {
        let api = MockApi::new(vec![Ok(created(3, None))]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();

        kiosk.select_area("a1");
        kiosk.confirm().await;
        assert!(!kiosk.poll_reset());

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(kiosk.poll_reset());
        assert!(matches!(kiosk.state(), AcquireState::SelectingArea));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_reset_returns_to_selection() {
        let api = MockApi::new(vec![Ok(created(3, None))]);
        let mut kiosk = TurnKiosk::new(&api)
            .await
            .unwrap()
            .with_reset_after(Duration::from_secs(2));

        kiosk.select_area("a1");
        kiosk.confirm().await;
        kiosk.wait_reset().await;
        assert!(matches!(kiosk.state(), AcquireState::SelectingArea));
    }

    #[tokio::test]
    async fn test_manual_new_turn_skips_countdown() {
        let api = MockApi::new(vec![Ok(created(3, None))]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();

        kiosk.select_area("a1");
        kiosk.confirm().await;
        kiosk.back();
        assert!(matches!(kiosk.state(), AcquireState::SelectingArea));
    }

    #[tokio::test]
    async fn test_back_clears_error() {
        let api = MockApi::new(vec![Err(ClientError::Server("boom".into()))]);
        let mut kiosk = TurnKiosk::new(&api).await.unwrap();

        kiosk.select_area("a1");
        kiosk.confirm().await;
        kiosk.back();
        assert!(matches!(kiosk.state(), AcquireState::SelectingArea));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_cancel() {
        let countdown = ResetCountdown::start(Duration::from_secs(5));
        countdown.cancel();
        assert!(!countdown.wait().await);
    }
}
