//! Décodage du contenu texte des éléments (CDATA, entités XML)

/// Renvoie le texte d'un élément : CDATA déballé, entités décodées, espaces retirés
pub fn content(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
    {
        return inner.trim().to_string();
    }
    unescape(trimmed)
}

/// Décode les entités XML prédéfinies et les références numériques
///
/// Une entité inconnue est recopiée telle quelle.
pub fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_plain() {
        assert_eq!(content("  Ladygrove \n"), "Ladygrove");
    }

    #[test]
    fn test_content_cdata() {
        assert_eq!(content("<![CDATA[ Didcot & Co ]]>"), "Didcot & Co");
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape("Fish &amp; Chips"), "Fish & Chips");
        assert_eq!(unescape("&lt;b&gt; &quot;x&quot; &apos;y&apos;"), "<b> \"x\" 'y'");
        assert_eq!(unescape("caf&#233; &#xE9;"), "café é");
    }

    #[test]
    fn test_unescape_unknown_entity_kept() {
        assert_eq!(unescape("A &nbsp B & C"), "A &nbsp B & C");
        assert_eq!(unescape("&bogus;"), "&bogus;");
    }
}
