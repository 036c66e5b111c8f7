//! Drives the core: applies user intents, performs database effects and
//! resolves them with whatever the database delivers.
//!
//! All resolution happens on the task that owns the [`Shell`]; network work
//! runs in spawned tasks that report back over a channel.

use crate::{rtdb_client::RealtimeDatabase, view::render_line};
use crux_core::{Core, Request};
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use sensor_panel_core::{App, Effect, Event, RtdbOperation, RtdbOutput, ScreenEvent, ViewModel};
use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

type RequestId = u64;

/// Output of a spawned database task, addressed to the request it answers
#[derive(Debug)]
struct Delivery {
    id: RequestId,
    output: RtdbOutput,
}

/// A standing subscription; its request is resolved once per change until
/// the core unsubscribes.
struct Listener {
    id: RequestId,
    request: Request<RtdbOperation>,
    task: JoinHandle<()>,
}

pub struct Shell<D> {
    core: Core<App>,
    db: Arc<D>,
    reconnect_delay: Duration,
    listeners: HashMap<String, Listener>,
    pending: HashMap<RequestId, Request<RtdbOperation>>,
    next_id: RequestId,
    tx: UnboundedSender<Delivery>,
    rx: UnboundedReceiver<Delivery>,
}

impl<D> Shell<D>
where
    D: RealtimeDatabase + Send + Sync + 'static,
{
    pub fn new(db: D, reconnect_delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            core: Core::new(),
            db: Arc::new(db),
            reconnect_delay,
            listeners: HashMap::new(),
            pending: HashMap::new(),
            next_id: 0,
            tx,
            rx,
        }
    }

    /// Open the screen, then serve intents until they run out or `shutdown`
    /// completes. The screen is always closed before returning.
    pub async fn run(
        mut self,
        mut intents: mpsc::Receiver<Event>,
        shutdown: impl Future<Output = ()>,
    ) {
        tokio::pin!(shutdown);

        self.dispatch(Event::Screen(ScreenEvent::Open));

        loop {
            tokio::select! {
                Some(delivery) = self.rx.recv() => self.deliver(delivery),
                intent = intents.recv() => match intent {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                _ = &mut shutdown => break,
            }
        }

        self.dispatch(Event::Screen(ScreenEvent::Close));
    }

    pub fn dispatch(&mut self, event: Event) {
        debug!("dispatching {event:?}");
        let effects = self.core.process_event(event);
        self.process(effects);
    }

    /// Wait for the next database delivery and resolve it
    pub async fn deliver_next(&mut self) {
        if let Some(delivery) = self.rx.recv().await {
            self.deliver(delivery);
        }
    }

    pub fn view(&self) -> ViewModel {
        self.core.view()
    }

    pub fn active_listeners(&self) -> usize {
        self.listeners.len()
    }

    fn process(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(_) => info!("{}", render_line(&self.core.view())),
                Effect::Rtdb(request) => self.perform(request),
            }
        }
    }

    fn perform(&mut self, request: Request<RtdbOperation>) {
        match request.operation.clone() {
            RtdbOperation::Subscribe { path } => self.subscribe(path, request),

            RtdbOperation::Unsubscribe { path } => {
                match self.listeners.remove(&path) {
                    Some(listener) => {
                        listener.task.abort();
                        info!("stopped listening to {path}");
                    }
                    None => debug!("no listener for {path}"),
                }
                self.resolve(request, RtdbOutput::Unsubscribed);
            }

            RtdbOperation::Read { path } => {
                let db = Arc::clone(&self.db);
                self.spawn_once(request, async move {
                    match db.read(path).await {
                        Ok(data) => RtdbOutput::Value { data },
                        Err(e) => RtdbOutput::Error {
                            message: format!("{e:#}"),
                        },
                    }
                });
            }

            RtdbOperation::Write { path, value } => {
                let db = Arc::clone(&self.db);
                self.spawn_once(request, async move {
                    match db.write(path, value).await {
                        Ok(()) => RtdbOutput::Written,
                        Err(e) => RtdbOutput::Error {
                            message: format!("{e:#}"),
                        },
                    }
                });
            }
        }
    }

    fn subscribe(&mut self, path: String, request: Request<RtdbOperation>) {
        let id = self.next_request_id();
        let task = tokio::spawn(forward_changes(
            Arc::clone(&self.db),
            path.clone(),
            id,
            self.tx.clone(),
            self.reconnect_delay,
        ));

        let listener = Listener { id, request, task };
        if let Some(previous) = self.listeners.insert(path.clone(), listener) {
            warn!("replacing existing listener for {path}");
            previous.task.abort();
        }
    }

    fn spawn_once<F>(&mut self, request: Request<RtdbOperation>, work: F)
    where
        F: Future<Output = RtdbOutput> + Send + 'static,
    {
        let id = self.next_request_id();
        self.pending.insert(id, request);

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let output = work.await;
            // the receiver only goes away together with the shell
            let _ = tx.send(Delivery { id, output });
        });
    }

    fn deliver(&mut self, Delivery { id, output }: Delivery) {
        let resolved = if let Some(mut request) = self.pending.remove(&id) {
            self.core.resolve(&mut request, output)
        } else if let Some(listener) = self.listeners.values_mut().find(|l| l.id == id) {
            self.core.resolve(&mut listener.request, output)
        } else {
            debug!("dropping delivery for finished request {id}");
            return;
        };

        match resolved {
            Ok(effects) => self.process(effects),
            Err(e) => error!("failed to resolve request {id}: {e}"),
        }
    }

    fn resolve(&mut self, mut request: Request<RtdbOperation>, output: RtdbOutput) {
        match self.core.resolve(&mut request, output) {
            Ok(effects) => self.process(effects),
            Err(e) => error!("failed to resolve {:?}: {e}", request.operation),
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_id += 1;
        self.next_id
    }
}

/// Keep an event stream on `path` open until aborted, reopening it after
/// failures. Every interruption is reported as a read error.
async fn forward_changes<D>(
    db: Arc<D>,
    path: String,
    id: RequestId,
    tx: UnboundedSender<Delivery>,
    reconnect_delay: Duration,
) where
    D: RealtimeDatabase + Send + Sync + 'static,
{
    loop {
        let message = match db.listen(path.clone()).await {
            Ok(mut events) => loop {
                match events.next().await {
                    Some(Ok(event)) => {
                        if let Some(output) = event.into_output() {
                            if tx.send(Delivery { id, output }).is_err() {
                                return;
                            }
                        }
                    }
                    Some(Err(e)) => break format!("{e:#}"),
                    None => break "event stream closed".to_string(),
                }
            },
            Err(e) => format!("{e:#}"),
        };

        warn!("listening to {path} interrupted: {message}");
        let output = RtdbOutput::Error { message };
        if tx.send(Delivery { id, output }).is_err() {
            return;
        }

        tokio::time::sleep(reconnect_delay).await;
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::{
        rtdb_client::{EventStream, MockRealtimeDatabase},
        sse::StreamEvent,
    };
    use futures_util::stream;
    use sensor_panel_core::{ConnectionStatus, LedEvent};
    use serde_json::json;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn put(value: serde_json::Value) -> anyhow::Result<StreamEvent> {
        Ok(StreamEvent::Put {
            path: "/".to_string(),
            data: value,
        })
    }

    /// Streams that deliver `events` and then stay open
    fn mock_listen(db: &mut MockRealtimeDatabase) {
        db.expect_listen().returning(|path| {
            let events = match path.as_str() {
                "Sensor/temperature" => vec![put(json!(23.5))],
                "Sensor/humidity" => vec![put(json!(48))],
                _ => vec![put(json!(false))],
            };
            Box::pin(async move {
                let events: EventStream = Box::pin(stream::iter(events).chain(stream::pending()));
                Ok(events)
            })
        });
    }

    async fn settle(shell: &mut Shell<MockRealtimeDatabase>, deliveries: usize) {
        for _ in 0..deliveries {
            timeout(WAIT, shell.deliver_next())
                .await
                .expect("delivery should arrive");
        }
    }

    #[tokio::test]
    async fn open_mirrors_subscribed_values() {
        let mut db = MockRealtimeDatabase::default();
        mock_listen(&mut db);

        let mut shell = Shell::new(db, Duration::from_secs(60));
        shell.dispatch(Event::Screen(ScreenEvent::Open));
        assert_eq!(shell.active_listeners(), 3);

        settle(&mut shell, 3).await;

        let view = shell.view();
        assert_eq!(view.temperature, 23.5);
        assert_eq!(view.humidity, 48.0);
        assert!(!view.led_on);
        assert_eq!(view.connection, ConnectionStatus::Connected);
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn close_stops_listening() {
        let mut db = MockRealtimeDatabase::default();
        mock_listen(&mut db);

        let mut shell = Shell::new(db, Duration::from_secs(60));
        shell.dispatch(Event::Screen(ScreenEvent::Open));
        settle(&mut shell, 3).await;

        shell.dispatch(Event::Screen(ScreenEvent::Close));

        assert_eq!(shell.active_listeners(), 0);
        assert!(!shell.view().is_open);
    }

    #[tokio::test]
    async fn led_write_is_sent_as_json() {
        let mut db = MockRealtimeDatabase::default();
        mock_listen(&mut db);
        db.expect_write()
            .withf(|path, value| path == "Led/status" && value == "true")
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let mut shell = Shell::new(db, Duration::from_secs(60));
        shell.dispatch(Event::Screen(ScreenEvent::Open));
        settle(&mut shell, 3).await;

        shell.dispatch(Event::Led(LedEvent::Set { on: true }));
        settle(&mut shell, 1).await;

        // the switch follows the subscription, not the write
        assert!(!shell.view().led_on);
    }

    #[tokio::test]
    async fn failed_listen_reports_disconnect() {
        let mut db = MockRealtimeDatabase::default();
        db.expect_listen().returning(|path| {
            Box::pin(async move {
                if path == "Sensor/temperature" {
                    anyhow::bail!("listen Sensor/temperature failed with status 401")
                }
                let events: EventStream = Box::pin(stream::pending());
                Ok(events)
            })
        });

        let mut shell = Shell::new(db, Duration::from_secs(60));
        shell.dispatch(Event::Screen(ScreenEvent::Open));
        settle(&mut shell, 1).await;

        let view = shell.view();
        assert_eq!(view.connection, ConnectionStatus::Disconnected);
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn refresh_reads_current_values() {
        let mut db = MockRealtimeDatabase::default();
        db.expect_listen().returning(|_| {
            Box::pin(async {
                let events: EventStream = Box::pin(stream::pending());
                Ok(events)
            })
        });
        db.expect_read().times(2).returning(|path| {
            Box::pin(async move {
                Ok(Some(match path.as_str() {
                    "Sensor/temperature" => "19.5".to_string(),
                    _ => "\"55\"".to_string(),
                }))
            })
        });

        let mut shell = Shell::new(db, Duration::from_secs(60));
        shell.dispatch(Event::Screen(ScreenEvent::Open));
        shell.dispatch(Event::Screen(ScreenEvent::Refresh));
        assert!(shell.view().is_loading);

        settle(&mut shell, 2).await;

        let view = shell.view();
        assert_eq!(view.temperature, 19.5);
        assert_eq!(view.humidity, 55.0);
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn run_closes_the_screen_when_intents_end() {
        let mut db = MockRealtimeDatabase::default();
        mock_listen(&mut db);

        let shell = Shell::new(db, Duration::from_secs(60));
        let (tx, rx) = mpsc::channel(1);
        drop(tx);

        timeout(WAIT, shell.run(rx, std::future::pending()))
            .await
            .expect("run should return once intents end");
    }
}
