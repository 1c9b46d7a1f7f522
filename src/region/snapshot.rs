//! Two-line JSON snapshot of a registry.
//!
//! Line 1 is `[min_width, min_height]`; line 2 is an array of
//! `{"box": [x, y, w, h], "active": bool, "group": int}` objects in index
//! order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::region::{BoxRect, BoxRegistry, MinSize};
use crate::trace::trace_event;
use crate::util::{GlyphGroupError, GlyphGroupResult};

#[derive(Debug, Serialize, Deserialize)]
struct RegionRecord {
    #[serde(rename = "box")]
    rect: [i32; 4],
    active: bool,
    group: u32,
}

impl BoxRegistry {
    /// Writes the snapshot to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> GlyphGroupResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_snapshot(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Replaces regions and minimum size with the snapshot stored at `path`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> GlyphGroupResult<()> {
        let reader = BufReader::new(File::open(path)?);
        self.read_snapshot(reader)
    }

    /// Serializes the snapshot into any writer.
    pub fn write_snapshot<W: Write>(&self, mut writer: W) -> GlyphGroupResult<()> {
        let min_size = [self.min_size.width, self.min_size.height];
        let records: Vec<RegionRecord> = self
            .regions
            .iter()
            .map(|region| RegionRecord {
                rect: region.rect.to_array(),
                active: region.active,
                group: region.group,
            })
            .collect();
        serde_json::to_writer(&mut writer, &min_size)?;
        writer.write_all(b"\n")?;
        serde_json::to_writer(&mut writer, &records)?;
        trace_event!("snapshot_saved", regions = records.len());
        Ok(())
    }

    /// Restores state from a snapshot reader.
    ///
    /// Regions receive fresh ids. `max_group` is raised to the largest group
    /// in the snapshot so newly minted groups never reuse a loaded id; it is
    /// never lowered.
    pub fn read_snapshot<R: BufRead>(&mut self, reader: R) -> GlyphGroupResult<()> {
        let mut lines = reader.lines();
        let min_line = lines.next().transpose()?.ok_or_else(|| missing("minimum size"))?;
        let regions_line = lines.next().transpose()?.ok_or_else(|| missing("regions"))?;

        let [min_width, min_height]: [i32; 2] = serde_json::from_str(min_line.trim())?;
        let records: Vec<RegionRecord> = serde_json::from_str(regions_line.trim())?;
        if let Some(bad) = records.iter().find(|r| r.rect[2] <= 0 || r.rect[3] <= 0) {
            return Err(GlyphGroupError::Snapshot {
                reason: format!("box {:?} has no area", bad.rect),
            });
        }
        if let Some(bad) = records.iter().find(|r| !BoxRect::from_array(r.rect).fits()) {
            return Err(GlyphGroupError::Snapshot {
                reason: format!("box {:?} extends past i32 coordinates", bad.rect),
            });
        }

        self.regions.clear();
        self.slots.clear();
        self.min_size = MinSize::new(min_width, min_height);
        for record in records {
            self.push_region(BoxRect::from_array(record.rect), record.active, record.group);
            self.max_group = self.max_group.max(record.group);
        }
        trace_event!(
            "snapshot_loaded",
            regions = self.regions.len(),
            max_group = self.max_group
        );
        Ok(())
    }
}

fn missing(what: &str) -> GlyphGroupError {
    GlyphGroupError::Snapshot {
        reason: format!("missing {what} line"),
    }
}
