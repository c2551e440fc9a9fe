//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. Input (pointer events -> gestures, hover, drag forces)
//! 2. Animation (tween stepping on the frame clock)
//! 3. RenderSync (copy state into visuals, popup, splatter texture)
//! 4. BeforeStep / Rapier / AfterStep (PostUpdate, around the physics step)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InputSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct AnimationSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct RenderSyncSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct BeforeStepSet; // runs in PostUpdate before Rapier reads the ECS

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct AfterStepSet; // runs in PostUpdate after Rapier writes back
