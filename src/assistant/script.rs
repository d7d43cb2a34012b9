//! The built-in sales assistant script. Rule order is observable behavior:
//! an utterance like "syarat kredit mobil bekas" matches several predicates
//! and resolves to whichever rule comes first.

use super::Predicate::{All, Any, Contains};
use super::{Rule, Topic};

pub(crate) const GREETING: &str = "Halo! Saya adalah AI Assistant yang siap membantu Anda mencari informasi tentang mobil. Apa yang ingin Anda ketahui?";

pub(crate) const FALLBACK: &str = "Maaf, saya tidak memahami pertanyaan Anda. Silakan pilih pertanyaan yang tersedia atau ajukan pertanyaan yang lebih spesifik tentang mobil.";

pub(crate) const SUGGESTED_PROMPTS: [&str; 5] = [
    "Apa saja syarat kredit mobil?",
    "Berapa DP minimal untuk kredit?",
    "Ada mobil bekas dibawah 100 juta?",
    "Bagaimana proses nego harga?",
    "Apakah tersedia test drive?",
];

pub(crate) static RULES: &[Rule] = &[
    Rule {
        topic: Topic::CreditRequirements,
        predicate: All(&[Contains("syarat"), Contains("kredit")]),
        reply: "Syarat kredit mobil:\n\n1. KTP Suami & Istri\n2. Kartu Keluarga\n3. Slip Gaji / SKU Usaha\n4. Rekening koran 3 bulan terakhir\n5. PBB/Sertifikat Rumah",
    },
    Rule {
        topic: Topic::DownPayment,
        predicate: Any(&[Contains("dp"), All(&[Contains("uang"), Contains("muka")])]),
        reply: "DP minimal untuk kredit mobil baru mulai dari 15-20% dari harga mobil. Untuk mobil bekas, DP minimal biasanya 25-30%. Kami menyediakan berbagai skema kredit yang bisa disesuaikan dengan kemampuan Anda.",
    },
    Rule {
        topic: Topic::UsedCarBudget,
        predicate: Any(&[Contains("100 juta"), Contains("bekas")]),
        reply: "Ya, kami memiliki beberapa pilihan mobil bekas berkualitas di bawah 100 juta, seperti:\n\n- Toyota Avanza (2015-2016)\n- Daihatsu Xenia (2016-2017)\n- Honda Brio (2015-2016)\n\nSemua unit sudah melalui inspeksi ketat dan memiliki garansi mesin.",
    },
    Rule {
        topic: Topic::PriceNegotiation,
        predicate: Contains("nego"),
        reply: "Anda bisa melakukan negosiasi harga dengan cara:\n\n1. Datang langsung ke showroom\n2. Diskusi dengan sales\n3. Bandingkan dengan harga pasaran\n\nKami selalu terbuka untuk negosiasi yang wajar.",
    },
    Rule {
        topic: Topic::TestDrive,
        predicate: Contains("test drive"),
        reply: "Ya, kami menyediakan layanan test drive untuk semua mobil yang Anda minati. Syaratnya:\n\n1. Membawa KTP\n2. SIM A aktif\n3. Reservasi minimal H-1\n\nSilakan hubungi sales kami untuk mengatur jadwal test drive.",
    },
];
