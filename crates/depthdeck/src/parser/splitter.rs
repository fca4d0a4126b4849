/// Split a deck body (after frontmatter) into raw slide texts.
///
/// A slide ends at:
/// 1. a `---` line with blank lines (or the body edge) around it,
/// 2. a run of three or more blank lines,
/// 3. a `# ` heading once the current slide already has content.
///
/// Nothing inside a fenced code block ever starts a slide. Directive lines
/// (`@key: value`) directly above an inferred heading travel with it.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.lines().collect();

    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence: Option<(char, usize)> = None;
    let mut blank_run = 0;

    for (i, &line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some((ch, len)) = fence {
            if closes_fence(trimmed, ch, len) {
                fence = None;
            }
            current.push(line);
            continue;
        }
        if let Some(opened) = opens_fence(trimmed) {
            fence = Some(opened);
            blank_run = 0;
            current.push(line);
            continue;
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                flush(&mut current, &mut slides);
            } else if blank_run < 3 {
                current.push(line);
            }
            continue;
        }

        let prev_blank = i == 0 || lines[i - 1].trim().is_empty();
        let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
        if is_dash_separator(trimmed) && prev_blank && next_blank {
            flush(&mut current, &mut slides);
            blank_run = 0;
            continue;
        }
        blank_run = 0;

        if line.starts_with("# ") && has_content(&current) {
            let carried = take_trailing_directives(&mut current);
            flush(&mut current, &mut slides);
            current.extend(carried);
        }
        current.push(line);
    }
    flush(&mut current, &mut slides);
    slides
}

fn flush(current: &mut Vec<&str>, slides: &mut Vec<String>) {
    let text = current.join("\n").trim().to_string();
    current.clear();
    if !text.is_empty() {
        slides.push(text);
    }
}

fn has_content(lines: &[&str]) -> bool {
    lines.iter().any(|l| {
        let t = l.trim();
        !t.is_empty() && !is_directive(t)
    })
}

/// Remove the directive/blank tail of `lines`, returning the directives.
fn take_trailing_directives<'a>(lines: &mut Vec<&'a str>) -> Vec<&'a str> {
    let keep = lines
        .iter()
        .rposition(|l| {
            let t = l.trim();
            !t.is_empty() && !is_directive(t)
        })
        .map_or(0, |pos| pos + 1);
    lines
        .split_off(keep)
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .collect()
}

fn opens_fence(trimmed: &str) -> Option<(char, usize)> {
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}

fn closes_fence(trimmed: &str, ch: char, len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == ch).count();
    count >= len && trimmed.chars().skip(count).all(char::is_whitespace)
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

pub(crate) fn is_directive(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('@') else {
        return false;
    };
    match rest.find(':') {
        Some(colon) if colon > 0 => rest[..colon]
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_'),
        _ => false,
    }
}
