//! MQTT feed of live segments
//!
//! Subscribes to a topic and forwards every JSON segment list published on it
//! to the main loop, which draws the latest list on top of the scene.

use linecast::scene::parse_segments;
use linecast::SegmentSpec;
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TOPIC: &str = "linecast/segments";

/// MQTT client that receives segment lists in a background thread
pub struct SegmentFeed {
    receiver: Receiver<Vec<SegmentSpec>>,
    _thread: thread::JoinHandle<()>,
}

impl SegmentFeed {
    /// Connect to the broker and subscribe.
    /// Fails immediately if connection cannot be established.
    pub fn connect(host: &str, topic: &str) -> Result<Self, String> {
        let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };

        let mut options = MqttOptions::new("linecast", host, DEFAULT_PORT);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut connection) = Client::new(options, 10);

        client
            .subscribe(topic, QoS::AtMostOnce)
            .map_err(|e| format!("Failed to subscribe to topic '{}': {}", topic, e))?;

        // Poll once so an unreachable broker fails here, not silently later
        match connection.iter().next() {
            Some(Ok(_)) => {},
            Some(Err(e)) => {
                return Err(format!(
                    "Failed to connect to MQTT broker at {}:{} - {}",
                    host, DEFAULT_PORT, e
                ));
            },
            None => {
                return Err(format!(
                    "Failed to connect to MQTT broker at {}:{} - connection closed",
                    host, DEFAULT_PORT
                ));
            },
        }

        let (sender, receiver) = mpsc::channel();
        let topic_owned = topic.to_string();

        let handle = thread::spawn(move || {
            Self::message_loop(connection, sender, &topic_owned);
        });

        log::info!("MQTT: connected to {}:{}, subscribed to '{}'", host, DEFAULT_PORT, topic);

        Ok(Self {
            receiver,
            _thread: handle,
        })
    }

    fn message_loop(
        mut connection: rumqttc::Connection,
        sender: Sender<Vec<SegmentSpec>>,
        topic: &str,
    ) {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topic => {
                    let Ok(text) = std::str::from_utf8(&publish.payload) else {
                        log::warn!("MQTT: ignoring non-UTF-8 payload on '{}'", topic);
                        continue;
                    };
                    match parse_segments(text.trim()) {
                        Ok(segments) => {
                            log::debug!("MQTT: received {} segments", segments.len());
                            if sender.send(segments).is_err() {
                                // Main thread gone
                                break;
                            }
                        },
                        Err(e) => log::warn!("MQTT: bad segment list: {}", e),
                    }
                },
                Ok(_) => {},
                Err(e) => {
                    // Keep polling, rumqttc reconnects on the next iteration
                    log::error!("MQTT error: {}", e);
                },
            }
        }
    }

    /// Latest segment list received since the last poll, discarding older ones
    pub fn poll(&self) -> Option<Vec<SegmentSpec>> {
        let mut latest = None;
        while let Ok(segments) = self.receiver.try_recv() {
            latest = Some(segments);
        }
        latest
    }
}
