//! Recorded input replays
//!
//! A replay is a JSON array of per-tick frames. Buttons are recorded as held
//! levels; jump edges are derived on playback the same way a live input
//! backend would.

use std::fs;
use std::path::Path;

use anyhow::Context;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use stride_locomotion::{ButtonEdge, HeadPose, InputSample, ScriptedHead};
use tracing::info;

/// One recorded tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayFrame {
    pub move_axis: Vec2,
    pub turn_axis: Vec2,
    /// Jump button held
    pub jump: bool,
    /// Sprint button held
    pub sprint: bool,
    /// Tracked head pose; the previous pose is reused when absent
    pub head: Option<HeadPose>,
}

/// A sequence of recorded ticks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Replay {
    pub frames: Vec<ReplayFrame>,
}

impl Replay {
    /// Load a replay from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay {:?}", path))?;
        let replay: Replay = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse replay {:?}", path))?;
        info!("Loaded replay with {} frames from {:?}", replay.frames.len(), path);
        Ok(replay)
    }

    /// Scripted session: settle, walk, sprint, snap turns, a jump, and a
    /// stretch of walking while looking straight up.
    pub fn builtin(ticks_per_second: f32) -> Self {
        let ticks = |seconds: f32| (seconds * ticks_per_second).round().max(1.0) as usize;
        let mut frames = Vec::new();
        let mut push = |count: usize, frame: ReplayFrame| {
            frames.extend(std::iter::repeat(frame).take(count));
        };

        let forward = Vec2::new(0.0, 1.0);
        push(ticks(1.0), ReplayFrame::default());
        push(
            ticks(2.0),
            ReplayFrame {
                move_axis: forward,
                ..Default::default()
            },
        );
        push(
            ticks(1.0),
            ReplayFrame {
                move_axis: forward,
                sprint: true,
                ..Default::default()
            },
        );
        for _ in 0..2 {
            push(
                ticks(0.5),
                ReplayFrame {
                    turn_axis: Vec2::new(1.0, 0.0),
                    ..Default::default()
                },
            );
            push(ticks(0.25), ReplayFrame::default());
        }
        push(
            ticks(0.1),
            ReplayFrame {
                move_axis: forward,
                jump: true,
                ..Default::default()
            },
        );
        push(ticks(1.5), ReplayFrame::default());
        push(
            ticks(0.5),
            ReplayFrame {
                move_axis: forward,
                head: Some(HeadPose::new(
                    Vec3::new(0.0, 1.6, 0.0),
                    Vec3::Y,
                    Vec3::X,
                )),
                ..Default::default()
            },
        );
        push(
            ticks(0.5),
            ReplayFrame {
                head: Some(HeadPose::default()),
                ..Default::default()
            },
        );

        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Split into per-tick input samples and a head script
    pub fn into_parts(self) -> (Vec<InputSample>, ScriptedHead) {
        let mut jump = ButtonEdge::new();
        let mut head = HeadPose::default();
        let mut inputs = Vec::with_capacity(self.frames.len());
        let mut poses = Vec::with_capacity(self.frames.len());

        for frame in self.frames {
            if let Some(pose) = frame.head {
                head = pose;
            }
            inputs.push(InputSample {
                move_axis: frame.move_axis,
                turn_axis: frame.turn_axis,
                jump: jump.update(frame.jump),
                sprint: frame.sprint,
            });
            poses.push(head);
        }

        (inputs, ScriptedHead::new(poses))
    }
}
