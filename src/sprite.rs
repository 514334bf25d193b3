//! Sprite decoding and kitty graphics encoding

use base64::Engine;
use serde::{Deserialize, Serialize};

const KITTY_CHUNK: usize = 4096;

/// Decoded RGBA pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err("empty image".to_string());
    }
    Ok(SpriteData {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Build the kitty graphics escape sequence that draws `sprite` scaled into
/// `cols` x `rows` cells at the cursor.
pub fn kitty_sequence(sprite: &SpriteData, cols: u16, rows: u16) -> Result<String, String> {
    let expected = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() != expected {
        return Err(format!(
            "sprite buffer is {} bytes, expected {expected}",
            sprite.rgba.len()
        ));
    }
    if cols == 0 || rows == 0 {
        return Err("no room for sprite".to_string());
    }

    let payload = base64::engine::general_purpose::STANDARD.encode(&sprite.rgba);
    let chunks: Vec<&[u8]> = payload.as_bytes().chunks(KITTY_CHUNK).collect();
    let last = chunks.len().saturating_sub(1);

    let mut out = String::with_capacity(payload.len() + chunks.len() * 16 + 64);
    for (index, chunk) in chunks.iter().enumerate() {
        let more = u8::from(index != last);
        // base64 output is ASCII
        let chunk = std::str::from_utf8(chunk).map_err(|err| err.to_string())?;
        if index == 0 {
            out.push_str(&format!(
                "\x1b_Ga=T,f=32,s={},v={},c={cols},r={rows},q=2,m={more};{chunk}\x1b\\",
                sprite.width, sprite.height
            ));
        } else {
            out.push_str(&format!("\x1b_Gm={more};{chunk}\x1b\\"));
        }
    }
    Ok(out)
}
