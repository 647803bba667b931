//! GuitarBridge: connects an input source to output sinks.

use crate::event::SnapshotEvent;
use crate::input::{InputError, InputSource};
use crate::output::{OutputError, OutputSink};

/// A bridge that forwards snapshot events from an input source to an output sink.
///
/// Use a tuple sink `(A, B)` to feed several listeners from one source.
///
/// # Error Handling
///
/// On input errors, the bridge sends a neutral snapshot so that no control
/// stays held on the outputs, and [`run`](Self::run) returns. Output errors
/// are reported by [`process_one`](Self::process_one) but do not stop `run`.
pub struct GuitarBridge<I, O> {
    input: I,
    output: O,
}

impl<I: InputSource, O: OutputSink> GuitarBridge<I, O> {
    /// Create a new bridge from an input source and output sink.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Forward events until the input fails, returning its error.
    pub async fn run(&mut self) -> InputError {
        loop {
            if let Err(BridgeError::Input(e)) = self.process_one().await {
                return e;
            }
        }
    }

    /// Process a single input and forward it to the output.
    ///
    /// Returns the result of the operation for testing purposes.
    pub async fn process_one(&mut self) -> Result<(), BridgeError> {
        match self.input.receive().await {
            Ok(event) => {
                self.output
                    .send(&event)
                    .await
                    .map_err(BridgeError::Output)?;
                Ok(())
            }
            Err(e) => {
                let _ = self.output.send(&SnapshotEvent::neutral()).await;
                Err(BridgeError::Input(e))
            }
        }
    }

    /// Get a reference to the input source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Get a mutable reference to the input source.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Get a reference to the output sink.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the output sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Decompose the bridge into its input and output components.
    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Error from the input source.
    Input(InputError),
    /// Error from the output sink.
    Output(OutputError),
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::future::Future;
    use embassy_futures::block_on;
    use guitar_proto::{DigitalInput, GuitarState};
    use std::sync::{Arc, Mutex};
    use std::vec;
    use std::vec::Vec;

    struct MockInput {
        events: Vec<Result<SnapshotEvent, InputError>>,
        index: usize,
    }

    impl MockInput {
        fn new(events: Vec<Result<SnapshotEvent, InputError>>) -> Self {
            Self { events, index: 0 }
        }
    }

    impl InputSource for MockInput {
        fn receive(&mut self) -> impl Future<Output = Result<SnapshotEvent, InputError>> {
            let result = if self.index < self.events.len() {
                let r = self.events[self.index];
                self.index += 1;
                r
            } else {
                Err(InputError::Disconnected)
            };
            core::future::ready(result)
        }

        fn is_connected(&self) -> bool {
            self.index < self.events.len()
        }
    }

    struct MockOutput {
        sent: Arc<Mutex<Vec<SnapshotEvent>>>,
        fail: bool,
    }

    impl MockOutput {
        fn new() -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl OutputSink for MockOutput {
        fn send(&mut self, event: &SnapshotEvent) -> impl Future<Output = Result<(), OutputError>> {
            self.sent.lock().unwrap().push(*event);
            let result = if self.fail {
                Err(OutputError::NotReady)
            } else {
                Ok(())
            };
            core::future::ready(result)
        }

        fn is_ready(&self) -> bool {
            !self.fail
        }
    }

    fn pressed(uptime: u64) -> SnapshotEvent {
        let mut state = GuitarState::neutral();
        state.uptime = uptime;
        state.set_digital(DigitalInput::Yellow, true);
        SnapshotEvent::new(state, false)
    }

    #[test]
    fn test_bridge_forwards_event() {
        let input = MockInput::new(vec![Ok(pressed(10))]);
        let output = MockOutput::new();
        let sent_ref = output.sent.clone();

        let mut bridge = GuitarBridge::new(input, output);

        let result = block_on(bridge.process_one());
        assert!(result.is_ok());

        let sent = sent_ref.lock().unwrap();
        assert_eq!(sent.as_slice(), &[pressed(10)]);
    }

    #[test]
    fn test_bridge_sends_neutral_on_error() {
        let input = MockInput::new(vec![Err(InputError::Io)]);
        let output = MockOutput::new();
        let sent_ref = output.sent.clone();

        let mut bridge = GuitarBridge::new(input, output);

        let result = block_on(bridge.process_one());
        assert!(matches!(result, Err(BridgeError::Input(InputError::Io))));

        let sent = sent_ref.lock().unwrap();
        assert_eq!(sent.as_slice(), &[SnapshotEvent::neutral()]);
    }

    #[test]
    fn test_run_stops_when_input_fails() {
        let input = MockInput::new(vec![Ok(pressed(1)), Ok(pressed(2))]);
        let output = MockOutput::new();
        let sent_ref = output.sent.clone();

        let mut bridge = GuitarBridge::new(input, output);
        assert_eq!(block_on(bridge.run()), InputError::Disconnected);

        let sent = sent_ref.lock().unwrap();
        assert_eq!(
            sent.as_slice(),
            &[pressed(1), pressed(2), SnapshotEvent::neutral()]
        );
        assert!(!bridge.input().is_connected());
    }

    #[test]
    fn test_run_survives_output_errors() {
        let input = MockInput::new(vec![Ok(pressed(1)), Ok(pressed(2))]);
        let output = MockOutput::failing();
        let sent_ref = output.sent.clone();

        let mut bridge = GuitarBridge::new(input, output);
        assert_eq!(
            block_on(bridge.process_one()),
            Err(BridgeError::Output(OutputError::NotReady))
        );
        assert_eq!(block_on(bridge.run()), InputError::Disconnected);
        assert_eq!(sent_ref.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_tuple_sink_feeds_both_listeners() {
        let display = MockOutput::new();
        let joystick = MockOutput::failing();
        let display_ref = display.sent.clone();
        let joystick_ref = joystick.sent.clone();

        let input = MockInput::new(vec![Ok(pressed(3))]);
        let mut bridge = GuitarBridge::new(input, (display, joystick));

        assert_eq!(
            block_on(bridge.process_one()),
            Err(BridgeError::Output(OutputError::NotReady))
        );
        assert!(!bridge.output().is_ready());
        assert_eq!(display_ref.lock().unwrap().as_slice(), &[pressed(3)]);
        assert_eq!(joystick_ref.lock().unwrap().as_slice(), &[pressed(3)]);
    }
}
