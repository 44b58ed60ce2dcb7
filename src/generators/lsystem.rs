//! L-system melody generator
//!
//! String rewriting from an axiom with per-symbol production rules, bounded
//! by a maximum string length so repeated iteration cannot grow without
//! limit. The rewritten string is interpreted turtle-style into notes:
//! `F`/`G` emit the current note and advance by the step interval, `+`/`-`
//! set the step direction up/down, `[`/`]` drop/raise an octave.

const MAX_STRING: usize = 4096;
const MAX_RULES: usize = 10;

#[derive(Debug, Clone)]
struct Rule {
    predecessor: char,
    successor: String,
}

/// Bounded L-system rewriter with melody interpretation.
pub struct LSystemMelody {
    axiom: String,
    current: String,
    rules: Vec<Rule>,
    iteration: u32,
    base_note: i32,
    note_step: i32,
}

impl LSystemMelody {
    pub fn new(axiom: &str) -> Self {
        Self {
            axiom: axiom.to_string(),
            current: axiom.chars().take(MAX_STRING).collect(),
            rules: Vec::new(),
            iteration: 0,
            base_note: 60,
            note_step: 2,
        }
    }

    /// Register a production rule; silently refused past the rule limit.
    pub fn add_rule(&mut self, predecessor: char, successor: &str) {
        if self.rules.len() >= MAX_RULES {
            return;
        }
        self.rules.push(Rule {
            predecessor,
            successor: successor.to_string(),
        });
    }

    pub fn set_base_note(&mut self, note: i32) {
        self.base_note = note;
    }

    pub fn set_note_step(&mut self, step: i32) {
        self.note_step = step;
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn symbols(&self) -> &str {
        &self.current
    }

    /// Rewind to the axiom.
    pub fn reset(&mut self) {
        self.current = self.axiom.chars().take(MAX_STRING).collect();
        self.iteration = 0;
    }

    /// Apply every rule once across the string. Output that would exceed
    /// the length bound is truncated.
    pub fn iterate(&mut self) {
        let mut next = String::with_capacity(self.current.len() * 2);

        'outer: for c in self.current.chars() {
            let replacement = self
                .rules
                .iter()
                .find(|r| r.predecessor == c)
                .map(|r| r.successor.as_str());

            match replacement {
                Some(succ) => {
                    for rc in succ.chars() {
                        if next.len() >= MAX_STRING {
                            break 'outer;
                        }
                        next.push(rc);
                    }
                }
                None => {
                    if next.len() >= MAX_STRING {
                        break;
                    }
                    next.push(c);
                }
            }
        }

        self.current = next;
        self.iteration += 1;
    }

    /// Interpret the current string as a melody, up to `max_notes` notes.
    pub fn to_melody(&self, max_notes: usize) -> Vec<i32> {
        let mut notes = Vec::new();
        let mut note = self.base_note;
        let mut step = self.note_step;

        for c in self.current.chars() {
            if notes.len() >= max_notes {
                break;
            }
            match c {
                'F' | 'G' => {
                    notes.push(note);
                    note += step;
                }
                '+' => step = step.abs(),
                '-' => step = -step.abs(),
                '[' => note -= 12,
                ']' => note += 12,
                _ => {}
            }
        }
        notes
    }
}
