/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{io::{self, Write}, sync::{Arc, Mutex}};
use tracing::debug;

use crate::{errors::{Result, display_error}, render::{DisplayGeometry, DisplayLines}};

/// the seam to the display device. Implementations buffer draw calls until `flush`, which pushes the
/// whole frame to the device
pub trait TextDisplay: Send {
    fn clear (&mut self)->Result<()>;

    /// draw `text` as line `index` with its baseline at pixel row `y`
    fn draw_line (&mut self, text: &str, index: usize, y: u32)->Result<()>;

    fn flush (&mut self)->Result<()>;

    fn power_off (&mut self)->Result<()>;
}

/// full redraw of one frame: clear, draw all lines at their fixed baselines, flush
pub fn submit (display: &mut dyn TextDisplay, lines: &DisplayLines, geometry: &DisplayGeometry)->Result<()> {
    display.clear()?;
    for (idx,line) in lines.iter().enumerate() {
        display.draw_line( line, idx, geometry.line_y(idx))?;
    }
    display.flush()
}

/// clear + power off, used when we shut down
pub fn blank (display: &mut dyn TextDisplay)->Result<()> {
    display.clear()?;
    display.flush()?;
    display.power_off()
}

/* #region ConsoleDisplay *****************************************************************************************/

/// prints framed text frames to stdout, for running without display hardware
pub struct ConsoleDisplay {
    columns: usize,
    frame: Vec<String>,
}

impl ConsoleDisplay {
    pub fn new (geometry: &DisplayGeometry)->Self {
        ConsoleDisplay { columns: geometry.columns(), frame: Vec::new() }
    }

    fn write_frame (&self, out: &mut impl Write)->io::Result<()> {
        let border = format!("+{}+", "-".repeat( self.columns));
        writeln!( out, "{border}")?;
        for line in &self.frame {
            writeln!( out, "|{:<w$}|", line, w = self.columns)?;
        }
        writeln!( out, "{border}")?;
        out.flush()
    }
}

impl TextDisplay for ConsoleDisplay {
    fn clear (&mut self)->Result<()> {
        self.frame.clear();
        Ok(())
    }

    fn draw_line (&mut self, text: &str, index: usize, _y: u32)->Result<()> {
        if self.frame.len() <= index {
            self.frame.resize( index+1, String::new());
        }
        self.frame[index] = text.to_string();
        Ok(())
    }

    fn flush (&mut self)->Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_frame( &mut out).map_err( |e| display_error!("console write failed: {e}"))
    }

    fn power_off (&mut self)->Result<()> {
        Ok(())
    }
}

/* #endregion ConsoleDisplay */

/* #region LogDisplay *********************************************************************************************/

/// headless operation - frames only show up in the log (at debug level)
#[derive(Debug,Default)]
pub struct LogDisplay {
    frame: Vec<String>,
}

impl LogDisplay {
    pub fn new ()->Self { LogDisplay::default() }
}

impl TextDisplay for LogDisplay {
    fn clear (&mut self)->Result<()> {
        self.frame.clear();
        Ok(())
    }

    fn draw_line (&mut self, text: &str, _index: usize, _y: u32)->Result<()> {
        self.frame.push( text.to_string());
        Ok(())
    }

    fn flush (&mut self)->Result<()> {
        debug!("frame: {}", self.frame.join(" | "));
        Ok(())
    }

    fn power_off (&mut self)->Result<()> {
        debug!("display off");
        Ok(())
    }
}

/* #endregion LogDisplay */

/* #region MemoryDisplay ******************************************************************************************/

/// what a [`MemoryDisplay`] has seen so far. Frames are only recorded on flush
#[derive(Debug,Clone,Default,PartialEq)]
pub struct DisplayRecord {
    pub frames: Vec<Vec<String>>,
    pub baselines: Vec<Vec<u32>>,
    pub clears: usize,
    pub flushes: usize,
    pub powered_off: bool,
}

impl DisplayRecord {
    pub fn last_frame (&self)->Option<&Vec<String>> { self.frames.last() }
}

/// a display that records frames in memory. Clones share the same record so that the record can be
/// inspected while the display itself is owned by the scheduler
#[derive(Debug,Clone,Default)]
pub struct MemoryDisplay {
    pending: Vec<(String,u32)>,
    record: Arc<Mutex<DisplayRecord>>,
    fail_flush: bool,
}

impl MemoryDisplay {
    pub fn new ()->Self { MemoryDisplay::default() }

    /// a display whose flush always fails, to check that we survive device errors
    pub fn failing ()->Self { MemoryDisplay { fail_flush: true, ..MemoryDisplay::default() } }

    pub fn record (&self)->DisplayRecord {
        self.record.lock().map( |r| r.clone()).unwrap_or_else( |poisoned| poisoned.into_inner().clone())
    }

    fn with_record<F> (&self, f: F) where F: FnOnce(&mut DisplayRecord) {
        let mut record = self.record.lock().unwrap_or_else( |poisoned| poisoned.into_inner());
        f( &mut record)
    }
}

impl TextDisplay for MemoryDisplay {
    fn clear (&mut self)->Result<()> {
        self.pending.clear();
        self.with_record( |r| r.clears += 1);
        Ok(())
    }

    fn draw_line (&mut self, text: &str, _index: usize, y: u32)->Result<()> {
        self.pending.push( (text.to_string(), y));
        Ok(())
    }

    fn flush (&mut self)->Result<()> {
        if self.fail_flush {
            return Err( display_error!("flush failed"))
        }

        let (lines,ys): (Vec<String>,Vec<u32>) = self.pending.iter().cloned().unzip();
        self.with_record( |r| {
            r.frames.push( lines);
            r.baselines.push( ys);
            r.flushes += 1;
        });
        Ok(())
    }

    fn power_off (&mut self)->Result<()> {
        self.with_record( |r| r.powered_off = true);
        Ok(())
    }
}

/* #endregion MemoryDisplay */
