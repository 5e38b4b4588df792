use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::data_mapper::{ChordEdge, DataMapper};
use crate::format::percentage;
use crate::palette::ArcColor;

#[derive(Debug, Clone, Serialize)]
pub struct ChordDiagram {
    pub generated_at: String,
    pub connection_mode: String,
    pub last_update: Option<String>,
    pub total_goals: usize,
    pub players: Vec<PlayerArc>,
    pub matrix: Vec<Vec<u32>>,
    pub chords: Vec<ChordRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerArc {
    pub name: String,
    pub color: String,
    pub goals: u32,
    pub points: u32,
    pub info: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChordRow {
    pub source: usize,
    pub target: usize,
    pub value: u32,
    pub info: String,
}

pub struct ExportReport {
    pub players: usize,
    pub chords: usize,
    pub json_written: bool,
    pub xlsx_written: bool,
}

/// Everything a chord renderer needs, with tooltips already formatted.
pub fn build_chord_diagram(mapper: &DataMapper, colors: &[ArcColor]) -> Result<ChordDiagram> {
    let matrix = mapper.player_matrix()?;
    let players = mapper
        .players()?
        .iter()
        .enumerate()
        .map(|(idx, p)| -> Result<PlayerArc> {
            Ok(PlayerArc {
                name: p.name.clone(),
                color: colors.get(idx).map(ArcColor::css).unwrap_or_default(),
                goals: p.goals,
                points: p.points,
                info: mapper.player_info(idx)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let chords = mapper
        .chords()?
        .iter()
        .map(|edge| chord_row(mapper, edge))
        .collect::<Result<Vec<_>>>()?;

    Ok(ChordDiagram {
        generated_at: Utc::now().to_rfc3339(),
        connection_mode: mapper.mode().to_string(),
        last_update: mapper.last_update().ok(),
        total_goals: mapper.total_goal_count(),
        players,
        matrix,
        chords,
    })
}

fn chord_row(mapper: &DataMapper, edge: &ChordEdge) -> Result<ChordRow> {
    Ok(ChordRow {
        source: edge.source,
        target: edge.target,
        value: edge.value,
        info: mapper.chord_info(edge)?,
    })
}

pub fn write_json(path: &Path, diagram: &ChordDiagram) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let json = serde_json::to_string_pretty(diagram).context("serialize chord diagram")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write chord diagram")?;
    fs::rename(&tmp, path).context("swap chord diagram")?;
    Ok(())
}

pub fn write_workbook(path: &Path, mapper: &DataMapper) -> Result<()> {
    let players = mapper.players()?;

    let mut matrix_rows = vec![
        std::iter::once(String::new())
            .chain(players.iter().map(|p| p.name.clone()))
            .collect::<Vec<_>>(),
    ];
    for p in players {
        let mut row = vec![p.name.clone()];
        row.extend(p.connections.iter().map(|c| c.to_string()));
        matrix_rows.push(row);
    }

    let mut player_rows = vec![vec![
        "Player".to_string(),
        "Goals".to_string(),
        "Points".to_string(),
        "Goal Share".to_string(),
        "Involvement".to_string(),
        "Unassisted".to_string(),
    ]];
    for (idx, p) in players.iter().enumerate() {
        player_rows.push(vec![
            p.name.clone(),
            p.goals.to_string(),
            p.points.to_string(),
            percentage(p.goal_share),
            percentage(p.involvement_share),
            p.connections.get(idx).copied().unwrap_or(0).to_string(),
        ]);
    }

    let mut chord_rows = vec![vec![
        "Source".to_string(),
        "Target".to_string(),
        "Connections".to_string(),
        "Shared Goals".to_string(),
        "Info".to_string(),
    ]];
    for edge in mapper.chords()? {
        chord_rows.push(vec![
            mapper.player_name(edge.source)?.to_string(),
            mapper.player_name(edge.target)?.to_string(),
            edge.value.to_string(),
            mapper.shared_goals(edge.source, edge.target)?.to_string(),
            mapper.chord_info(&edge)?,
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matrix")?;
        write_rows(sheet, &matrix_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &player_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Chords")?;
        write_rows(sheet, &chord_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

pub fn export_chords(
    mapper: &DataMapper,
    colors: &[ArcColor],
    json_path: Option<&Path>,
    xlsx_path: Option<&Path>,
) -> Result<ExportReport> {
    let diagram = build_chord_diagram(mapper, colors)?;
    if let Some(path) = json_path {
        write_json(path, &diagram)?;
        info!("wrote chord diagram json to {}", path.display());
    }
    if let Some(path) = xlsx_path {
        write_workbook(path, mapper)?;
        info!("wrote chord workbook to {}", path.display());
    }
    Ok(ExportReport {
        players: diagram.players.len(),
        chords: diagram.chords.len(),
        json_written: json_path.is_some(),
        xlsx_written: xlsx_path.is_some(),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
