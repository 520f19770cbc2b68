use crate::core::allocator::check_weight;
use crate::domain::model::WeightedEntity;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

// 欄位順序即 WeightedEntity 的欄位順序：id,name,weight,order

pub fn parse_sheet(content: &str) -> Result<Vec<WeightedEntity>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut entities = Vec::new();
    for row in reader.deserialize() {
        let entity: WeightedEntity = row?;
        check_weight(entity.weight)?;
        entities.push(entity);
    }
    Ok(entities)
}

pub fn read_sheet<P: AsRef<Path>>(path: P) -> Result<Vec<WeightedEntity>> {
    let content = fs::read_to_string(&path)?;
    let entities = parse_sheet(&content)?;
    tracing::debug!(
        "Loaded {} entries from {}",
        entities.len(),
        path.as_ref().display()
    );
    Ok(entities)
}

pub fn to_sheet_string(entities: &[WeightedEntity]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entity in entities {
        writer.serialize(entity)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_sheet<P: AsRef<Path>>(path: P, entities: &[WeightedEntity]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, to_sheet_string(entities)?)?;
    tracing::debug!("Wrote {} entries to {}", entities.len(), path.display());
    Ok(())
}
