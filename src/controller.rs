//! Remote control of a star field over an injected transport
//!
//! The experiment session is connected elsewhere; the controller only reads
//! JSON messages from the handle it is given and applies them to the field
//! between frames. Messages are objects tagged by `"command"`:
//!
//! ```json
//! {"command": "set_rotate_rate", "deg_hz": 36.0}
//! {"command": "set_oscillation", "rate_hz": 1.0, "max_angle_deg": 30.0}
//! {"command": "change_spheres", "field": {"star_count": 2}, "positions": [[0,0,10],[0,10,0]]}
//! ```

use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::config::StarFieldParams;
use crate::field::StarField;
use crate::scene::SceneContainer;
use crate::Vector3;

/// Source of raw command messages from an already connected session
pub trait Transport {
    /// Next pending message, or `None` when nothing is waiting. Must not block.
    fn poll(&mut self) -> anyhow::Result<Option<String>>;
}

/// In-process transport fed through a channel
pub struct ChannelTransport {
    rx: Receiver<String>,
}

impl ChannelTransport {
    pub fn new(rx: Receiver<String>) -> Self {
        Self { rx }
    }
}

impl Transport for ChannelTransport {
    fn poll(&mut self) -> anyhow::Result<Option<String>> {
        match self.rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => bail!("stimulus channel disconnected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StimulusCommand {
    ChangeSpheres {
        #[serde(default)]
        field: StarFieldParams,
        positions: Vec<[f64; 3]>,
    },
    ClearSpheres,
    /// Exactly one of the two rates must be given
    SetRotateRate {
        #[serde(default)]
        rad_hz: Option<f64>,
        #[serde(default)]
        deg_hz: Option<f64>,
    },
    SetOscillation {
        rate_hz: f64,
        max_angle_deg: f64,
    },
    SetRotationAbsolute {
        angle_rad: f64,
    },
    SetTrialId {
        trial_id: u64,
    },
}

impl StimulusCommand {
    /// Fails for commands the field would panic on or cannot interpret
    pub fn check(&self) -> anyhow::Result<()> {
        match self {
            StimulusCommand::ChangeSpheres {
                field: params,
                positions,
            } => {
                if positions.len() < params.star_count {
                    bail!(
                        "change_spheres has {} positions for {} stars",
                        positions.len(),
                        params.star_count
                    );
                }
                if params.star_count > 0 && params.angular_radius_deg.is_empty() {
                    bail!("change_spheres has no angular radii");
                }
                if params.star_count > 0 && params.color.is_empty() {
                    bail!("change_spheres has no colors");
                }
            }
            StimulusCommand::SetRotateRate { rad_hz, deg_hz } => {
                if rad_hz.is_some() == deg_hz.is_some() {
                    bail!("set_rotate_rate needs exactly one of rad_hz or deg_hz");
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply to `field` if [`StimulusCommand::check`] passes; the field is
    /// untouched otherwise
    pub fn apply<G: SceneContainer>(self, field: &mut StarField<G>) -> anyhow::Result<()> {
        self.check()?;
        match self {
            StimulusCommand::ChangeSpheres {
                field: params,
                positions,
            } => {
                let positions = positions
                    .into_iter()
                    .map(|[x, y, z]| Vector3::new(x, y, z))
                    .collect();
                field.change_spheres(params, positions);
            }
            StimulusCommand::ClearSpheres => field.clear_spheres(),
            StimulusCommand::SetRotateRate { rad_hz, deg_hz } => match (rad_hz, deg_hz) {
                (Some(rad_hz), None) => field.set_rotate_rate_rad_hz(rad_hz),
                (None, Some(deg_hz)) => field.set_rotate_rate_deg_hz(deg_hz),
                _ => bail!("set_rotate_rate needs exactly one of rad_hz or deg_hz"),
            },
            StimulusCommand::SetOscillation {
                rate_hz,
                max_angle_deg,
            } => field.set_oscillation(rate_hz, max_angle_deg),
            StimulusCommand::SetRotationAbsolute { angle_rad } => {
                field.set_rotation_absolute(angle_rad)
            }
            StimulusCommand::SetTrialId { trial_id } => field.set_trial_id(trial_id),
        }
        Ok(())
    }
}

pub struct StimulusController<T: Transport> {
    transport: T,
    applied: u64,
    rejected: u64,
}

impl<T: Transport> StimulusController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            applied: 0,
            rejected: 0,
        }
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Total commands applied since creation
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Total messages that could not be decoded or were refused
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Apply every pending command, in arrival order
    ///
    /// Call between frames, never from inside a tick. Undecodable or
    /// inconsistent messages are skipped with a warning; transport failures
    /// are returned.
    ///
    /// # Returns
    /// Number of commands applied in this call
    pub fn pump<G: SceneContainer>(&mut self, field: &mut StarField<G>) -> anyhow::Result<usize> {
        let mut applied = 0;
        while let Some(message) = self.transport.poll()? {
            match serde_json::from_str::<StimulusCommand>(&message) {
                Ok(command) => {
                    tracing::debug!(?command, "applying stimulus command");
                    match command.apply(field) {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            self.rejected += 1;
                            tracing::warn!(error = %e, %message, "skipping invalid stimulus command");
                        }
                    }
                }
                Err(e) => {
                    self.rejected += 1;
                    tracing::warn!(error = %e, %message, "skipping malformed stimulus command");
                }
            }
        }
        self.applied += applied as u64;
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::animation::Motion;
    use crate::field::clock::ManualClock;
    use crate::field::FieldHooks;
    use crate::geometry::Color;
    use crate::scene::StarGroup;
    use std::sync::mpsc;

    fn field() -> StarField {
        StarField::with_hooks(
            StarFieldParams {
                star_count: 3,
                ..Default::default()
            },
            vec![Vector3::new(0.0, 0.0, 10.0); 3],
            StarGroup::new(),
            FieldHooks::default().with_clock(ManualClock::new(0.0)),
        )
    }

    #[test]
    fn test_decode_commands() {
        let cmd: StimulusCommand =
            serde_json::from_str(r#"{"command":"set_rotate_rate","deg_hz":36}"#).unwrap();
        assert_eq!(
            cmd,
            StimulusCommand::SetRotateRate {
                rad_hz: None,
                deg_hz: Some(36.0)
            }
        );
        let cmd: StimulusCommand = serde_json::from_str(r#"{"command":"clear_spheres"}"#).unwrap();
        assert_eq!(cmd, StimulusCommand::ClearSpheres);
        assert!(serde_json::from_str::<StimulusCommand>(r#"{"command":"explode"}"#).is_err());
    }

    #[test]
    fn test_pump_applies_in_order() {
        let (tx, rx) = mpsc::channel();
        let mut controller = StimulusController::new(ChannelTransport::new(rx));
        let mut field = field();

        tx.send(r#"{"command":"set_rotate_rate","rad_hz":1.0}"#.to_string())
            .unwrap();
        tx.send(r#"{"command":"set_rotation_absolute","angle_rad":2.0}"#.to_string())
            .unwrap();
        tx.send(r#"{"command":"set_trial_id","trial_id":12}"#.to_string())
            .unwrap();

        assert_eq!(controller.pump(&mut field).unwrap(), 3);
        assert_eq!(field.motion(), Motion::Rotating);
        assert_eq!(field.rotation(), 2.0);
        assert_eq!(field.trial_id(), 12);
        assert_eq!(controller.pump(&mut field).unwrap(), 0);
        assert_eq!(controller.applied(), 3);
    }

    #[test]
    fn test_change_spheres_command() {
        let (tx, rx) = mpsc::channel();
        let mut controller = StimulusController::new(ChannelTransport::new(rx));
        let mut field = field();
        field.set_rotation_absolute(1.0);

        tx.send(
            r##"{"command":"change_spheres",
                "field":{"star_count":2,"color":["#ff0000"],"angular_radius_deg":[5.0]},
                "positions":[[0,0,10],[0,10,0]]}"##
                .to_string(),
        )
        .unwrap();
        controller.pump(&mut field).unwrap();

        assert_eq!(field.rotation(), 0.0);
        assert_eq!(field.stars().len(), 2);
        assert_eq!(field.stars()[1].position, Vector3::new(0.0, 10.0, 0.0));
        assert!(field.stars().iter().all(|s| s.color == Color::RED));
    }

    #[test]
    fn test_malformed_message_skipped() {
        let (tx, rx) = mpsc::channel();
        let mut controller = StimulusController::new(ChannelTransport::new(rx));
        let mut field = field();

        tx.send("not json".to_string()).unwrap();
        tx.send(r#"{"command":"set_oscillation","rate_hz":1.0,"max_angle_deg":30.0}"#.to_string())
            .unwrap();

        assert_eq!(controller.pump(&mut field).unwrap(), 1);
        assert_eq!(controller.rejected(), 1);
        assert_eq!(field.motion(), Motion::Oscillating);
    }

    #[test]
    fn test_disconnected_transport_errors() {
        let (tx, rx) = mpsc::channel::<String>();
        let mut controller = StimulusController::new(ChannelTransport::new(rx));
        let mut field = field();
        tx.send(r#"{"command":"clear_spheres"}"#.to_string()).unwrap();
        drop(tx);
        assert!(controller.pump(&mut field).is_err());
        // the message sent before the disconnect was still applied
        assert!(field.stars().is_empty());
    }

    #[test]
    fn test_short_positions_rejected() {
        let (tx, rx) = mpsc::channel();
        let mut controller = StimulusController::new(ChannelTransport::new(rx));
        let mut field = field();
        field.set_rotation_absolute(1.0);

        // default star_count is 100
        tx.send(r#"{"command":"change_spheres","positions":[[0,0,10]]}"#.to_string())
            .unwrap();
        tx.send(r#"{"command":"set_trial_id","trial_id":4}"#.to_string())
            .unwrap();

        assert_eq!(controller.pump(&mut field).unwrap(), 1);
        assert_eq!(controller.rejected(), 1);
        assert_eq!(field.stars().len(), 3);
        assert_eq!(field.params().star_count, 3);
        assert_eq!(field.rotation(), 1.0);
        assert_eq!(field.trial_id(), 4);
    }

    #[test]
    fn test_empty_lists_rejected() {
        let (tx, rx) = mpsc::channel();
        let mut controller = StimulusController::new(ChannelTransport::new(rx));
        let mut field = field();

        tx.send(
            r#"{"command":"change_spheres","field":{"star_count":1,"color":[]},"positions":[[0,0,10]]}"#
                .to_string(),
        )
        .unwrap();
        tx.send(
            r#"{"command":"change_spheres","field":{"star_count":1,"angular_radius_deg":[]},"positions":[[0,0,10]]}"#
                .to_string(),
        )
        .unwrap();
        // nothing to build, so empty lists are fine
        tx.send(
            r#"{"command":"change_spheres","field":{"star_count":0,"color":[]},"positions":[]}"#
                .to_string(),
        )
        .unwrap();

        assert_eq!(controller.pump(&mut field).unwrap(), 1);
        assert_eq!(controller.rejected(), 2);
        assert!(field.stars().is_empty());
    }

    #[test]
    fn test_rotate_rate_needs_exactly_one() {
        let (tx, rx) = mpsc::channel();
        let mut controller = StimulusController::new(ChannelTransport::new(rx));
        let mut field = field();

        tx.send(r#"{"command":"set_rotate_rate","rad_hz":1.0,"deg_hz":36.0}"#.to_string())
            .unwrap();
        tx.send(r#"{"command":"set_rotate_rate"}"#.to_string())
            .unwrap();

        assert_eq!(controller.pump(&mut field).unwrap(), 0);
        assert_eq!(controller.rejected(), 2);
        assert_eq!(field.motion(), Motion::Idle);
        assert!(StimulusCommand::SetRotateRate {
            rad_hz: Some(1.0),
            deg_hz: None
        }
        .check()
        .is_ok());
    }
}
