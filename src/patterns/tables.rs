//! Built-in pattern tables.
//!
//! Each kind owns an ordered list of needles. Table order is significant:
//! reports and prompts list frameworks and entry points in this order.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single search needle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Needle {
    /// Plain substring
    Literal(&'static str),
    /// Regular expression
    Pattern(&'static str),
}

/// Framework recognised by import or annotation markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrameworkKind {
    FastApi,
    Django,
    Flask,
    Express,
    React,
    Vue,
    Angular,
    Spring,
    Rails,
}

impl FrameworkKind {
    /// Every framework, in table order.
    pub const ALL: [Self; 9] = [
        Self::FastApi,
        Self::Django,
        Self::Flask,
        Self::Express,
        Self::React,
        Self::Vue,
        Self::Angular,
        Self::Spring,
        Self::Rails,
    ];

    /// Get display name for the framework.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FastApi => "FastAPI",
            Self::Django => "Django",
            Self::Flask => "Flask",
            Self::Express => "Express",
            Self::React => "React",
            Self::Vue => "Vue",
            Self::Angular => "Angular",
            Self::Spring => "Spring",
            Self::Rails => "Rails",
        }
    }

    /// Markers whose presence anywhere in the tree implies the framework.
    pub fn needles(&self) -> &'static [Needle] {
        use Needle::{Literal, Pattern};

        match self {
            Self::FastApi => &[Literal("from fastapi import"), Literal("import fastapi")],
            Self::Django => &[Literal("from django."), Literal("import django")],
            Self::Flask => &[Literal("from flask import"), Literal("import flask")],
            Self::Express => &[Literal("require('express')"), Literal("from 'express'")],
            Self::React => &[Literal("from 'react'"), Literal("import React")],
            Self::Vue => &[Literal("from 'vue'"), Literal("import Vue")],
            Self::Angular => &[Literal("@angular/"), Literal("import { Component }")],
            Self::Spring => {
                &[Literal("@SpringBootApplication"), Literal("org.springframework")]
            }
            Self::Rails => &[
                Pattern(r"class\s+\w+(::\w+)*\s*<\s*ApplicationController"),
                Literal("Rails.application"),
            ],
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Kind of place where external input enters a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointKind {
    /// HTTP route handler
    ApiEndpoint,
    /// Command-line command declaration
    CliCommand,
    /// Event listener or subscriber
    EventHandler,
    /// Cron-style scheduled job
    ScheduledJob,
}

impl EntryPointKind {
    /// Every entry-point kind, in table order.
    pub const ALL: [Self; 4] =
        [Self::ApiEndpoint, Self::CliCommand, Self::EventHandler, Self::ScheduledJob];

    /// Get display name for the entry-point kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ApiEndpoint => "API Endpoint",
            Self::CliCommand => "CLI Command",
            Self::EventHandler => "Event Handler",
            Self::ScheduledJob => "Scheduled Job",
        }
    }

    pub fn needles(&self) -> &'static [Needle] {
        use Needle::{Literal, Pattern};

        match self {
            Self::ApiEndpoint => &[
                Pattern(r#"@app\.(get|post|put|delete|patch)\(['"]([^'"]+)"#),
                Pattern(r#"@router\.(get|post|put|delete|patch)\(['"]([^'"]+)"#),
                Pattern(r#"app\.(get|post|put|delete|patch)\(['"]([^'"]+)"#),
            ],
            Self::CliCommand => &[
                Pattern(r"@click\.command\(\)"),
                Pattern(r"@typer\.command\(\)"),
                Pattern(r"def main\("),
            ],
            Self::EventHandler => &[
                Pattern(r"@event\."),
                Pattern(r#"\.on\(['"]([^'"]+)"#),
                Pattern(r#"addEventListener\(['"]([^'"]+)"#),
            ],
            Self::ScheduledJob => {
                &[Literal("@cron"), Literal("@schedule"), Literal("cron.schedule")]
            }
        }
    }
}

impl fmt::Display for EntryPointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A compiled needle.
#[derive(Debug)]
pub(crate) enum Matcher {
    Literal(&'static str),
    Regex(Regex),
}

impl Matcher {
    /// First occurrence in `text`.
    pub(crate) fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        match self {
            Self::Literal(needle) => {
                text.find(*needle).map(|start| &text[start..start + needle.len()])
            }
            Self::Regex(re) => re.find(text).map(|m| m.as_str()),
        }
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Literal(needle) => text.contains(*needle),
            Self::Regex(re) => re.is_match(text),
        }
    }
}

fn compile(needles: &[Needle]) -> Vec<Matcher> {
    needles
        .iter()
        .filter_map(|needle| match *needle {
            Needle::Literal(s) => Some(Matcher::Literal(s)),
            Needle::Pattern(p) => match Regex::new(p) {
                Ok(re) => Some(Matcher::Regex(re)),
                Err(e) => {
                    tracing::warn!(pattern = p, error = %e, "Invalid built-in pattern");
                    None
                }
            },
        })
        .collect()
}

pub(crate) static FRAMEWORK_TABLE: Lazy<Vec<(FrameworkKind, Vec<Matcher>)>> = Lazy::new(|| {
    FrameworkKind::ALL.iter().map(|kind| (*kind, compile(kind.needles()))).collect()
});

pub(crate) static ENTRY_POINT_TABLE: Lazy<Vec<(EntryPointKind, Vec<Matcher>)>> =
    Lazy::new(|| {
        EntryPointKind::ALL.iter().map(|kind| (*kind, compile(kind.needles()))).collect()
    });
