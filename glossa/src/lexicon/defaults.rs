//! Built-in stop words and derivational suffix patterns.

/// Function words dropped during tokenization, per language
pub const STOP_WORDS: &[(&str, &[&str])] = &[
    (
        "fr",
        &[
            "les", "des", "une", "est", "sont", "dans", "pour", "par", "sur", "avec", "sans",
            "qui", "que", "quoi", "dont", "mais", "donc", "car", "pas", "plus", "moins", "tout",
            "tous", "toute", "toutes", "aux", "leur", "leurs", "son", "ses", "ces", "cet",
            "cette", "mon", "mes", "ton", "tes", "nous", "vous", "ils", "elle", "elles", "été",
            "être", "avoir", "fait", "comme", "entre", "aussi", "très", "lui", "même", "autre",
            "autres", "peut", "selon", "chez", "vers",
        ],
    ),
    (
        "en",
        &[
            "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
            "was", "one", "our", "out", "has", "his", "how", "its", "who", "that", "this",
            "with", "from", "they", "have", "been", "were", "which", "their", "there", "these",
            "those", "what", "when", "where", "into", "than", "then", "them", "some", "such",
            "also", "very", "more", "most", "other", "about", "over", "under", "between",
            "through", "being", "used", "something", "someone",
        ],
    ),
    (
        "es",
        &[
            "los", "las", "del", "una", "uno", "unos", "unas", "que", "por", "para", "con",
            "sin", "sobre", "entre", "como", "más", "pero", "sus", "les", "este", "esta",
            "estos", "estas", "ese", "esa", "esos", "esas", "ser", "son", "está", "están", "fue",
            "han", "hay", "muy", "también", "todo", "todos", "toda", "todas", "cual", "cuando",
            "donde", "quien", "otro", "otra", "otros", "otras", "puede", "según", "hacia",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "den", "dem", "des", "ein", "eine", "einer", "eines", "einem",
            "einen", "und", "oder", "aber", "nicht", "mit", "von", "für", "auf", "aus", "bei",
            "nach", "über", "unter", "zwischen", "durch", "ist", "sind", "war", "waren", "wird",
            "werden", "hat", "haben", "sein", "seine", "ihre", "sich", "auch", "sehr", "noch",
            "wie", "wenn", "dass", "welche", "welcher", "etwas", "jemand", "kann", "dieser",
            "diese", "dieses",
        ],
    ),
];

/// Derivational suffixes that mark a short token as significant, per language
pub const SUFFIX_PATTERNS: &[(&str, &[&str])] = &[
    (
        "fr",
        &[
            r"(tion|sion)$",
            r"(ment|age)$",
            r"(ité|isme|iste)$",
            r"(eur|euse|rice)$",
            r"(ance|ence|aire)$",
        ],
    ),
    (
        "en",
        &[
            r"(tion|sion)$",
            r"(ness|ment|ship|hood)$",
            r"(ity|ism|ist)$",
            r"(ance|ence)$",
            r"(able|ible|ology)$",
        ],
    ),
    (
        "es",
        &[
            r"(ción|sión)$",
            r"(miento|mente)$",
            r"(idad|ismo|ista)$",
            r"(anza|encia|ancia)$",
            r"(dor|dora)$",
        ],
    ),
    (
        "de",
        &[
            r"(ung|heit|keit|schaft)$",
            r"(tion|ismus)$",
            r"(lich|bar|sam)$",
            r"(chen|lein)$",
        ],
    ),
];
