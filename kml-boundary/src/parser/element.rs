//! Recherche d'éléments XML par nom de balise
//!
//! Les commentaires `<!-- ... -->` sont sautés. Les préfixes d'espace de
//! noms (`<kml:Placemark>`) ne sont pas reconnus : les exports des outils
//! de carte en ligne utilisent l'espace de noms par défaut.

use memchr::memmem;

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";

/// Élément trouvé dans le texte source
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    /// Contenu entre la balise ouvrante et la balise fermante
    pub inner: &'a str,

    /// Offset de la balise ouvrante
    pub start: usize,

    /// Offset juste après la balise fermante
    pub end: usize,
}

/// Cherche le premier élément `<tag ...>...</tag>` à partir de `from`
///
/// Les balises auto-fermantes (`<tag/>`) renvoient un contenu vide.
/// `<tag` doit être suivi de `>`, `/` ou d'un espace (`<Placemark` ne
/// correspond pas à `<PlacemarkStyle`). Une balise située dans un
/// commentaire est ignorée.
pub fn find<'a>(text: &'a str, tag: &str, from: usize) -> Option<Element<'a>> {
    let bytes = text.as_bytes();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let open_finder = memmem::Finder::new(open.as_bytes());

    let mut cursor = from;
    loop {
        let start = cursor + open_finder.find(bytes.get(cursor..)?)?;

        if let Some(offset) = memmem::find(&bytes[cursor..start], COMMENT_OPEN) {
            let body = cursor + offset + COMMENT_OPEN.len();
            cursor = body + memmem::find(&bytes[body..], COMMENT_CLOSE)? + COMMENT_CLOSE.len();
            continue;
        }

        let after = start + open.len();

        match bytes.get(after) {
            Some(b'>') | Some(b'/') => {}
            Some(b) if b.is_ascii_whitespace() => {}
            _ => {
                cursor = after;
                continue;
            }
        }

        let gt = after + memchr::memchr(b'>', &bytes[after..])?;
        if bytes[gt - 1] == b'/' {
            return Some(Element {
                inner: "",
                start,
                end: gt + 1,
            });
        }

        let content_start = gt + 1;
        let content_end = content_start + memmem::find(&bytes[content_start..], close.as_bytes())?;

        return Some(Element {
            inner: &text[content_start..content_end],
            start,
            end: content_end + close.len(),
        });
    }
}

/// Itère sur tous les éléments `tag` successifs (non imbriqués)
pub fn find_all<'a>(text: &'a str, tag: &'a str) -> impl Iterator<Item = Element<'a>> + 'a {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let element = find(text, tag, cursor)?;
        cursor = element.end;
        Some(element)
    })
}
