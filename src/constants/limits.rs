// ABOUTME: Heuristic thresholds and keyword lists for the think tool and response parser.
// ABOUTME: Keeps the tunable numbers out of the implementations.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! Heuristic limits and keyword lists

/// Logical-connective phrases counted when classifying thinking depth
pub const CONNECTIVE_PHRASES: &[&str] = &[
    "however",
    "therefore",
    "consequently",
    "furthermore",
    "moreover",
    "nevertheless",
    "because",
    "although",
];

/// Strategic-verb keywords counted when scoring strategic value
pub const STRATEGIC_KEYWORDS: &[&str] = &[
    "prioritize",
    "optimize",
    "leverage",
    "streamline",
    "consolidate",
    "align",
    "focus",
    "scale",
];

/// Reasoning length above which depth can be classified `deep`
pub const DEEP_REASONING_MIN_CHARS: usize = 500;
/// Connective count required for `deep` classification
pub const DEEP_MIN_CONNECTIVES: usize = 3;
/// Reasoning length above which depth can be classified `moderate`
pub const MODERATE_REASONING_MIN_CHARS: usize = 200;

/// Base strategic value before keyword bonuses
pub const STRATEGIC_VALUE_BASE: u8 = 3;
/// Strategic value bounds
pub const STRATEGIC_VALUE_RANGE: (u8, u8) = (1, 10);

/// Base confidence level before adjustments
pub const CONFIDENCE_BASE: f64 = 0.8;
/// Concerns length beyond which confidence is penalized
pub const CONCERNS_PENALTY_MIN_CHARS: usize = 50;
/// Reasoning length beyond which confidence is boosted
pub const REASONING_BONUS_MIN_CHARS: usize = 300;
/// Confidence level bounds
pub const CONFIDENCE_RANGE: (f64, f64) = (0.1, 1.0);

/// Numeric values at or below this are not surfaced as copyable amounts
pub const ACTIONABLE_AMOUNT_FLOOR: f64 = 100.0;

/// Minimum length for a name/email to participate in close-match
/// duplicate warnings. Substring containment on very short values
/// produces noise ("Co" matching "Coca-Cola").
pub const CLOSE_MATCH_MIN_CHARS: usize = 3;
