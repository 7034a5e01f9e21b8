use unicode_normalization::UnicodeNormalization;

/// 辞書照合用のテキスト正規化
///
/// 契約:
/// 1. NFKC で全角英数・半角カナ・互換文字を畳む（"ＷワークＯＫ" → "WワークOK"、"ﾘﾓｰﾄ" → "リモート"）
/// 2. 大文字を小文字化する
/// 3. 連続する空白（全角スペース含む）を半角スペース1個に圧縮し、前後の空白を落とす
///
/// タグ辞書の正規表現はこの形に対して書かれる前提。
pub fn normalize_for_match(input: &str) -> String {
    let folded = input.nfkc().collect::<String>().to_lowercase();

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for ch in folded.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}
